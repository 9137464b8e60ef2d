//! List registered blocks.

use proto_blocks_core::BlockRegistry;

/// Print every registered block with its title.
pub fn run() {
    print!("{}", listing(&BlockRegistry::with_builtin_blocks()));
}

fn listing(registry: &BlockRegistry) -> String {
    let width = registry.names().iter().map(|n| n.len()).max().unwrap_or(0);

    registry
        .blocks()
        .map(|block| format!("{:<width$}  {}\n", block.name(), block.title(), width = width))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lists_blocks_in_registration_order() {
        let out = listing(&BlockRegistry::with_builtin_blocks());
        let names: Vec<_> = out
            .lines()
            .map(|l| l.split_whitespace().next().unwrap())
            .collect();

        assert_eq!(
            names,
            vec!["proto/card", "proto/hero", "proto/stats", "proto/testimonial", "proto/header-nav"]
        );
        assert!(out.contains(&format!("proto/stats{}Stats Counter", " ".repeat(8))));
    }
}
