use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use wakachi::dict::connection::ConnectionMatrix;
use wakachi::dict::{builder, Dictionary, FstDictionary};
use wakachi::{Token, Tokenizer};

#[derive(Parser)]
#[command(name = "wakachi", about = "Japanese morphological tokenizer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a MeCab-style lexicon CSV into a dictionary file
    Compile {
        /// Input lexicon CSV
        lexicon_csv: String,
        /// Output dictionary file
        output_file: String,
    },
    /// Compile a connection matrix (matrix.def or flat format)
    CompileConn {
        /// Input text file
        input_txt: String,
        /// Output binary file
        output_file: String,
    },
    /// Show dictionary or connection matrix info (auto-detected by magic bytes)
    Info {
        /// Dictionary (.dict) or connection matrix (.conn) file
        file: String,
    },
    /// Look up a surface form in the dictionary (exact match)
    Lookup {
        /// Dictionary file
        dict_file: String,
        /// Surface form to look up
        surface: String,
    },
    /// Tokenize text (from arguments, or stdin when none given)
    Tokenize {
        /// Dictionary file
        dict_file: String,
        /// Connection matrix file (optional; unigram scoring without it)
        #[arg(long)]
        conn: Option<String>,
        /// Output one JSON record per token instead of a text table
        #[arg(long)]
        json: bool,
        /// Text to tokenize; reads lines from stdin when omitted
        text: Vec<String>,
    },
}

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// JSON shape matching the tokenizer's original record layout.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRecord<'a> {
    surface: &'a str,
    pos: String,
    base_form: Option<&'a str>,
    reading: Option<&'a str>,
    start: usize,
    end: usize,
    pos_type: &'a str,
}

impl<'a> From<&'a Token> for TokenRecord<'a> {
    fn from(t: &'a Token) -> Self {
        Self {
            surface: &t.surface,
            pos: t.pos_joined(),
            base_form: t.base_form.as_deref(),
            reading: t.reading.as_deref(),
            start: t.start,
            end: t.end,
            pos_type: t.pos_type(),
        }
    }
}

fn compile(lexicon_csv: &str, output_file: &str) {
    let file = die!(File::open(lexicon_csv), "Error opening {lexicon_csv}: {}");
    let dict = die!(
        builder::build_from_lexicon(BufReader::new(file)),
        "Error parsing lexicon: {}"
    );
    let (surfaces, entries) = dict.stats();
    eprintln!("Built dictionary: {surfaces} surfaces, {entries} entries");
    die!(
        dict.save(Path::new(output_file)),
        "Error writing dictionary: {}"
    );
    let file_size = fs::metadata(output_file).map(|m| m.len()).unwrap_or(0);
    eprintln!(
        "Wrote {output_file} ({:.1} MB)",
        file_size as f64 / 1_048_576.0
    );
}

fn compile_conn(input_txt: &str, output_file: &str) {
    let text = die!(
        fs::read_to_string(input_txt),
        "Error reading {input_txt}: {}"
    );
    let conn = die!(
        ConnectionMatrix::from_text(&text),
        "Error parsing matrix: {}"
    );
    eprintln!("Parsed matrix: {} connection IDs", conn.num_ids());
    die!(
        conn.save(Path::new(output_file)),
        "Error writing matrix: {}"
    );
}

fn info(file: &str) {
    let bytes = die!(fs::read(file), "Error reading {file}: {}");
    match bytes.get(..4) {
        Some(b"WKDX") => {
            let dict = die!(
                FstDictionary::from_bytes(&bytes),
                "Error loading dictionary: {}"
            );
            let (surfaces, entries) = dict.stats();
            println!("dictionary: {surfaces} surfaces, {entries} entries");
        }
        Some(b"WKCX") => {
            let conn = die!(
                ConnectionMatrix::from_bytes(&bytes),
                "Error loading matrix: {}"
            );
            println!("connection matrix: {} ids", conn.num_ids());
        }
        _ => {
            eprintln!("Error: {file} is neither a dictionary nor a connection matrix");
            process::exit(1);
        }
    }
}

fn lookup(dict_file: &str, surface: &str) {
    let dict = die!(
        FstDictionary::open(Path::new(dict_file)),
        "Error loading dictionary: {}"
    );
    match dict.lookup(surface) {
        Some(entries) => {
            for e in entries {
                println!(
                    "{surface}\t{}\t{}\t{}\t({},{})",
                    dict.pos_path(e.pos_id).join(","),
                    e.base_form.as_deref().unwrap_or("-"),
                    e.reading.as_deref().unwrap_or("-"),
                    e.left_id,
                    e.right_id,
                );
            }
        }
        None => {
            eprintln!("not found: {surface}");
            process::exit(1);
        }
    }
}

fn print_tokens(tokens: &[Token], json: bool) {
    for t in tokens {
        if json {
            let record = TokenRecord::from(t);
            println!(
                "{}",
                serde_json::to_string(&record).expect("token serializes")
            );
        } else {
            println!(
                "{}\t{}\t{}\t{}\t[{},{})",
                t.surface,
                t.pos_joined(),
                t.base_form.as_deref().unwrap_or("-"),
                t.reading.as_deref().unwrap_or("-"),
                t.start,
                t.end,
            );
        }
    }
}

fn tokenize(dict_file: &str, conn_file: Option<&str>, json: bool, text: &[String]) {
    let dict = die!(
        FstDictionary::open(Path::new(dict_file)),
        "Error loading dictionary: {}"
    );
    let mut tokenizer = Tokenizer::new(dict);
    if let Some(conn_file) = conn_file {
        let conn = die!(
            ConnectionMatrix::open(Path::new(conn_file)),
            "Error loading connection matrix: {}"
        );
        tokenizer = tokenizer.with_connection(conn);
    }

    if text.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = die!(line, "Error reading stdin: {}");
            let tokens = die!(tokenizer.tokenize(&line), "Tokenization failed: {}");
            print_tokens(&tokens, json);
        }
    } else {
        for t in text {
            let tokens = die!(tokenizer.tokenize(t), "Tokenization failed: {}");
            print_tokens(&tokens, json);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Compile {
            lexicon_csv,
            output_file,
        } => compile(&lexicon_csv, &output_file),
        Command::CompileConn {
            input_txt,
            output_file,
        } => compile_conn(&input_txt, &output_file),
        Command::Info { file } => info(&file),
        Command::Lookup { dict_file, surface } => lookup(&dict_file, &surface),
        Command::Tokenize {
            dict_file,
            conn,
            json,
            text,
        } => tokenize(&dict_file, conn.as_deref(), json, &text),
    }
}
