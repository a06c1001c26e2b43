use galley_kernel::{fingerprint, normalize};
use serde_json::json;

pub fn run(text: Option<String>, file: Option<String>, json_output: bool) {
    let raw = match (text, file) {
        (Some(text), None) => text,
        (None, Some(path)) => std::fs::read_to_string(&path).unwrap_or_else(|e| {
            eprintln!("error: failed to read {path}: {e}");
            std::process::exit(2);
        }),
        _ => {
            eprintln!("error: provide TEXT or --file");
            std::process::exit(2);
        }
    };

    let normalized = normalize(&raw);
    let fp = fingerprint(&raw);

    if json_output {
        let payload = json!({
            "normalized": normalized,
            "fingerprint": fp.to_string(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("galley fingerprint");
        println!("  Normalized: {normalized}");
        println!("  Fingerprint: {fp}");
    }
}
