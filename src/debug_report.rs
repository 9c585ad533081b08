use dictee::{Context, Entity, NodeSummary, ParseDetails, ParseResultVerbose};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        fn wrap(&self, s: &str, code: &str) -> String {
            if self.enabled { format!("{code}{s}{RESET}") } else { s.to_string() }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            self.wrap(s.as_ref(), color)
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            self.wrap(s.as_ref(), BOLD)
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            self.wrap(s.as_ref(), DIM)
        }
    }
}

pub fn print_run(input: &str, ctx: &Context, res: &ParseResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let details = &res.details;
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Parsing: \"{input}\""), ansi::CYAN)));
    println!("{}", palette.dim(format!("   today: {}  │  active rules: {}", ctx.today, details.active_rules.len())));

    println!("\n{}", palette.paint("━━━ Saturation ━━━", ansi::GRAY));
    print_saturation(details, &palette);

    println!("\n{}", palette.paint("━━━ Results ━━━", ansi::GRAY));
    if res.results.is_empty() {
        println!("{}", palette.dim("  Nothing recognized"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • Rules were filtered out (check bucket/phrase requirements)");
        println!("  • Regex patterns didn't match");
        println!("  • Productions or resolvers rejected the values (impossible date, hour 25)");
        println!("\n{}", palette.dim("  Tip: RUST_LOG=dictee=debug shows rule activation and rejections"));
    } else {
        print_entities(&res.results, &palette);
        let hidden = details.all_candidates.len().saturating_sub(res.results.len());
        if hidden > 0 {
            println!("  {}", palette.dim(format!("({hidden} smaller candidates covered by these)")));
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Saturation: {}  │  Resolve: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.paint(format!("{:?}", details.saturation_total), ansi::CYAN),
        palette.dim(format!("{:?}", details.resolve)),
    );
    println!();
}

fn print_saturation(details: &ParseDetails, palette: &ansi::Palette) {
    for pass in &details.saturation {
        let label = if pass.pass == 0 { "Pass 0 (regex):".to_string() } else { format!("Pass {}:", pass.pass) };

        println!(
            "  {} {} {}",
            palette.paint(label, ansi::BLUE),
            if pass.produced > 0 {
                palette.paint(format!("✓ {} tokens", pass.produced), ansi::GREEN)
            } else {
                palette.dim(format!("✗ {} tokens", pass.produced))
            },
            palette.dim(format!("({}/{} rules seeded)", pass.rules_seeded, pass.rules_considered)),
        );

        for node in pass.samples.iter().take(5) {
            println!("    {}", fmt_node_compact(node, palette));
        }
        if pass.samples.len() > 5 {
            println!("    {}", palette.dim(format!("... +{} more", pass.samples.len() - 5)));
        }
    }
}

fn print_entities(entities: &[Entity], palette: &ansi::Palette) {
    for (idx, ent) in entities.iter().enumerate() {
        println!(
            "  {} {} {} {} {}",
            palette.paint(format!("[{idx}]"), ansi::GRAY),
            palette.bold(palette.paint(format!("{:?}", ent.value), ansi::GREEN)),
            palette.dim("│"),
            palette.paint(format!("span {}..{}", ent.start, ent.end), ansi::YELLOW),
            palette.dim(format!("\"{}\"", ent.body)),
        );
        println!(
            "      {} {}  {} {}",
            palette.dim("dim:"),
            palette.paint(&ent.name, ansi::BLUE),
            palette.dim("│ rule:"),
            palette.paint(&ent.rule, ansi::CYAN)
        );
    }
}

fn fmt_node_compact(node: &NodeSummary, palette: &ansi::Palette) -> String {
    format!(
        "{} {} {}",
        palette.paint(format!("{}..{}", node.start, node.end), ansi::YELLOW),
        palette.paint(&node.rule, ansi::BLUE),
        palette.dim(&node.preview)
    )
}
