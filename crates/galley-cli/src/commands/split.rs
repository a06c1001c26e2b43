use galley_kernel::{split_layer_blocks, split_list_items};
use serde_json::json;

pub fn run(text: String, json_output: bool) {
    let items = split_list_items(&text);
    let (base, tail) = split_layer_blocks(&text);

    if json_output {
        let payload = json!({
            "listItems": items,
            "layerBase": base,
            "layerTail": tail,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("galley split");
        println!("  List items ({}):", items.len());
        for item in &items {
            println!("    - {item}");
        }
        println!("  Layer base: {base:?}");
        println!("  Layer tail: {tail:?}");
    }
}
