// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_note(sections: usize) -> String {
    let base = "# Title\n\nSome **bold** and *italic* text with `code` and a [[Linked Note#Part|link]].\n\n- Bullet with [[Other]]\n  - Nested item\n- Another item\n\n> Quoted [[Third|text]]\n> continues here\n\n---\n\n```rust\nfn example() {}\n```\n\n";
    base.repeat(sections)
}

/// Caret offsets spread across the buffer, stepping over whole sections.
#[allow(dead_code)]
pub fn caret_walk(text: &str, steps: usize) -> Vec<usize> {
    let stride = (text.len() / steps.max(1)).max(1);
    (0..steps)
        .map(|i| {
            let mut at = (i * stride).min(text.len());
            while !text.is_char_boundary(at) {
                at -= 1;
            }
            at
        })
        .collect()
}
