//! CLI probe for `memopa_core`.
//!
//! # Responsibility
//! - Verify core linkage without the Flutter runtime.
//! - Show how a marker-encoded note string decodes into segments.

use memopa_core::{decode, Segment};

fn main() {
    println!("memopa_core ping={}", memopa_core::ping());
    println!("memopa_core version={}", memopa_core::core_version());

    let Some(content) = std::env::args().nth(1) else {
        return;
    };
    for (index, segment) in decode(&content).iter().enumerate() {
        match segment {
            Segment::Text { content, .. } => println!("{index}: text {content:?}"),
            Segment::Card { id, title, body } => {
                println!("{index}: card id={id} title={title:?} body={body:?}")
            }
        }
    }
}
