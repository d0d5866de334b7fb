//! Shared in-memory test dictionary.
//!
//! Costs and connection IDs are loosely modeled on IPADIC: nouns are 1,
//! particles 2, verbs 3, with ID 0 reserved for BOS/EOS.

use crate::dict::connection::ConnectionMatrix;
use crate::dict::{FstDictionary, PosTable, WordEntry};

fn entry(
    pos_id: u16,
    base_form: Option<&str>,
    reading: Option<&str>,
    cost: i16,
    conn_id: u16,
) -> WordEntry {
    WordEntry {
        pos_id,
        base_form: base_form.map(str::to_string),
        reading: reading.map(str::to_string),
        cost,
        left_id: conn_id,
        right_id: conn_id,
    }
}

pub(crate) fn test_dict() -> FstDictionary {
    let mut pos = PosTable::new();
    let noun = pos.intern(&["名詞", "一般"]);
    let proper = pos.intern(&["名詞", "固有名詞", "地域", "一般"]);
    let particle = pos.intern(&["助詞", "係助詞"]);
    let verb = pos.intern(&["動詞", "自立"]);

    let entries = vec![
        (
            "すもも".to_string(),
            vec![entry(noun, Some("すもも"), Some("スモモ"), 7546, 1)],
        ),
        (
            "もも".to_string(),
            vec![entry(noun, Some("もも"), Some("モモ"), 7219, 1)],
        ),
        (
            "も".to_string(),
            vec![entry(particle, Some("も"), Some("モ"), 4669, 2)],
        ),
        (
            "の".to_string(),
            vec![entry(particle, Some("の"), Some("ノ"), 4770, 2)],
        ),
        (
            "うち".to_string(),
            vec![entry(noun, Some("うち"), Some("ウチ"), 5796, 1)],
        ),
        (
            "東京".to_string(),
            vec![entry(proper, Some("東京"), Some("トウキョウ"), 3003, 1)],
        ),
        (
            "京".to_string(),
            vec![entry(noun, Some("京"), Some("キョウ"), 6000, 1)],
        ),
        (
            "都".to_string(),
            vec![entry(noun, Some("都"), Some("ト"), 5500, 1)],
        ),
        (
            "に".to_string(),
            vec![entry(particle, Some("に"), Some("ニ"), 4000, 2)],
        ),
        (
            "走っ".to_string(),
            vec![entry(verb, Some("走る"), Some("ハシッ"), 6000, 3)],
        ),
        // あ/い/あい exist to exercise transition-cost-dependent path
        // choices: unigram scoring splits あい, a matrix that penalizes
        // particle→noun joins it.
        (
            "あ".to_string(),
            vec![entry(particle, Some("あ"), Some("ア"), 4000, 2)],
        ),
        (
            "い".to_string(),
            vec![entry(noun, Some("い"), Some("イ"), 4000, 1)],
        ),
        (
            "あい".to_string(),
            vec![entry(noun, Some("あい"), Some("アイ"), 9000, 1)],
        ),
    ];

    FstDictionary::from_entries(entries, pos).expect("test dictionary must build")
}

/// 4×4 matrix: particles are cheap after nouns/verbs, everything else flat.
pub(crate) fn test_conn() -> ConnectionMatrix {
    let n = 4usize;
    let mut costs = vec![200i16; n * n];
    let mut set = |left: usize, right: usize, cost: i16| costs[left * n + right] = cost;
    set(1, 2, -300); // noun → particle
    set(3, 2, -300); // verb → particle
    set(2, 1, -100); // particle → noun
    set(0, 1, 0); // BOS → noun
    set(1, 0, 0); // noun → EOS
    set(2, 0, 50); // particle → EOS
    ConnectionMatrix::new_owned(4, costs)
}
