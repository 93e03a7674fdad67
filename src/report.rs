use intentc::RunSummary;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_summary(input: &str, summary: &RunSummary, color: bool) {
    let palette = ansi::Palette::new(color);
    let compile = &summary.compile;
    let reconcile = &summary.reconcile;

    println!("\n{}", palette.bold(palette.paint(format!("⚙  Compiled: {input}"), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Compile ━━━", ansi::GRAY));
    println!(
        "  Intents: {}  │  Blocks: {}  │  Ignored: {}",
        palette.paint(compile.intents.to_string(), ansi::GREEN),
        compile.blocks,
        highlight_nonzero(&palette, compile.blocks_ignored),
    );
    println!(
        "  Examples deduplicated: {}  │  truncated: {}  │  synthesized: {}",
        compile.examples_deduplicated, compile.examples_truncated, compile.examples_synthesized,
    );
    if compile.cross_language_collisions > 0 {
        println!(
            "  {}",
            palette.paint(
                format!("{} phrase(s) removed for appearing in both languages", compile.cross_language_collisions),
                ansi::YELLOW,
            )
        );
    }
    if compile.placeholder_variants > 0 {
        println!(
            "  {}",
            palette.dim(format!("{} intent(s) received the translation-stub response", compile.placeholder_variants))
        );
    }

    println!("\n{}", palette.paint("━━━ Reconcile ━━━", ansi::GRAY));
    if reconcile.is_noop() {
        println!("  {}", palette.dim("Registries already up to date"));
    } else {
        println!(
            "  Intents added: {}  │  Rules added: {}  │  Stories added: {}",
            palette.paint(reconcile.intents_added.to_string(), ansi::GREEN),
            palette.paint(reconcile.rules_added.to_string(), ansi::GREEN),
            palette.paint(reconcile.stories_added.to_string(), ansi::GREEN),
        );
        if reconcile.aliases_canonicalized > 0 {
            println!("  Legacy fallback actions rewritten: {}", reconcile.aliases_canonicalized);
        }
        if reconcile.duplicates_collapsed > 0 {
            println!("  Duplicate fallback entries removed: {}", reconcile.duplicates_collapsed);
        }
        if reconcile.fallback_action_added {
            println!("  {}", palette.dim("Fallback action added to the domain"));
        }
    }
    println!();
}

fn highlight_nonzero(palette: &ansi::Palette, value: usize) -> String {
    if value > 0 { palette.paint(value.to_string(), ansi::YELLOW) } else { value.to_string() }
}
