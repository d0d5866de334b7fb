fn main() {
    // Validate the embedded TOML at compile time.
    validate_toml(
        "src/default_config.toml",
        include_str!("src/default_config.toml"),
    );
}

fn validate_toml(path: &str, content: &str) {
    if content.parse::<toml::Value>().is_err() {
        panic!("{path} contains invalid TOML");
    }
}
