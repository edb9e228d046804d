// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with some **bold** content\nwrapped onto a second line.\n\n- Bullet point\n  continued here\n- [x] Done item\n1. Numbered\n\n| Name | Value |\n|:-----|------:|\n| a | `1` |\n| b | [link](other.md) |\n\n> Quoted ~~text~~\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n---\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_cjk_content(size: usize) -> String {
    "# 标题\n\n这是一个段落\n继续这个段落\n\n- 列表项\n".repeat(size)
}
