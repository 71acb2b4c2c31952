//! Interactive REPL for browsing the catalog and trying recommendations.
//!
//! Launch with `shopwise-mcp repl`. Type `/help` for commands, Tab for completion.

use std::sync::Arc;

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};

use shopwise::{
    trending_listing, Catalog, RandomImageProvider, RandomPriceProvider, Recommender,
    DEFAULT_TOP_N, TRENDING_LIMIT,
};

use crate::config::{resolve_catalog_path, resolve_trending_path};
use crate::session::NO_RECOMMENDATIONS_MESSAGE;
use crate::tools::ToolRegistry;

const COMMANDS: &[(&str, &str)] = &[
    ("/load", "Load a catalog CSV"),
    ("/recommend", "Recommend products: /recommend <name> [| top_n]"),
    ("/trending", "Show the trending listing"),
    ("/stats", "Show catalog statistics"),
    ("/tools", "List available MCP tools"),
    ("/info", "Show server capabilities"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// Completes commands and, after `/recommend`, product names.
struct ShopHelper {
    names: Vec<String>,
}

impl Completer for ShopHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        if let Some(prefix) = input.strip_prefix("/recommend ") {
            let start = input.len() - prefix.len();
            let matches: Vec<Pair> = self
                .names
                .iter()
                .filter(|n| n.starts_with(prefix))
                .take(50)
                .map(|n| Pair {
                    display: n.clone(),
                    replacement: n.clone(),
                })
                .collect();
            return Ok((start, matches));
        }

        if let Some(prefix) = input.strip_prefix("/load ") {
            let start = input.len() - prefix.len();
            let mut files: Vec<String> = std::fs::read_dir(".")
                .map(|entries| {
                    entries
                        .flatten()
                        .map(|e| e.path())
                        .filter(|p| p.extension().is_some_and(|e| e == "csv"))
                        .filter_map(|p| p.file_name().and_then(|s| s.to_str()).map(String::from))
                        .collect()
                })
                .unwrap_or_default();
            files.sort();
            let matches = files
                .into_iter()
                .filter(|f| f.starts_with(prefix.trim()))
                .map(|f| Pair {
                    display: f.clone(),
                    replacement: format!("{f} "),
                })
                .collect();
            return Ok((start, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for ShopHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for ShopHelper {}
impl Validator for ShopHelper {}
impl Helper for ShopHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

struct ReplState {
    catalog_path: Option<String>,
    recommender: Option<Recommender>,
}

/// Split `/recommend` arguments into a product name and an optional count.
///
/// Names may contain spaces, so the count is separated by `|`.
fn parse_recommend_args(args: &str) -> Result<(String, usize), String> {
    let (name, count) = match args.rsplit_once('|') {
        Some((name, count)) => (name.trim(), Some(count.trim())),
        None => (args.trim(), None),
    };
    if name.is_empty() {
        return Err("Usage: /recommend <product name> [| top_n]".to_string());
    }
    let top_n = match count {
        None | Some("") => DEFAULT_TOP_N,
        Some(raw) => raw
            .parse::<i64>()
            .map(shopwise::clamp_top_n)
            .map_err(|_| format!("Invalid count '{raw}'"))?,
    };
    Ok((name.to_string(), top_n))
}

/// Run the interactive REPL.
pub fn run() -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mshopwise-mcp v{}\x1b[0m \x1b[90m\u{2014} Content-based product recommendations\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<ShopHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(ShopHelper { names: Vec::new() }));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".shopwise_mcp_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let mut state = ReplState {
        catalog_path: None,
        recommender: None,
    };
    let prompt = " \x1b[36mshop>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let mut parts = input.splitn(2, ' ');
                let cmd = parts.next().unwrap_or("");
                let args = parts.next().unwrap_or("").trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(),
                    "tools" => cmd_tools(),
                    "load" => {
                        if let Some(names) = cmd_load(args, &mut state) {
                            rl.set_helper(Some(ShopHelper { names }));
                        }
                    }
                    "recommend" | "rec" => cmd_recommend(args, &mut state),
                    "trending" => cmd_trending(args),
                    "stats" => cmd_stats(&mut state),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = std::fs::create_dir_all(hist_path.parent().unwrap_or(std::path::Path::new(".")));
    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: after /load, Tab completes product names for /recommend.");
    eprintln!();
}

fn cmd_info() {
    let capabilities = crate::types::InitializeResult::current();
    let tools = ToolRegistry::list_tools();
    eprintln!();
    eprintln!(
        "  Server:   {} v{}",
        capabilities.server_info.name, capabilities.server_info.version
    );
    eprintln!("  Protocol: {}", capabilities.protocol_version);
    eprintln!("  Tools:    {}", tools.len());
    eprintln!();
}

fn cmd_tools() {
    let tools = ToolRegistry::list_tools();
    eprintln!();
    eprintln!("  {} MCP tools available:", tools.len());
    eprintln!();
    for tool in &tools {
        eprintln!("    {:<28} {}", tool.name, tool.description);
    }
    eprintln!();
}

/// Returns the product names of the loaded catalog for completion.
fn cmd_load(args: &str, state: &mut ReplState) -> Option<Vec<String>> {
    let path = if args.is_empty() {
        resolve_catalog_path(None)
    } else {
        args.to_string()
    };

    match Catalog::from_path(&path) {
        Ok(catalog) => {
            eprintln!("  Loaded: {path} ({} products)", catalog.len());
            let names = catalog.iter().map(|i| i.name.clone()).collect();
            state.recommender = Some(Recommender::new(Arc::new(catalog)));
            state.catalog_path = Some(path);
            Some(names)
        }
        Err(e) => {
            eprintln!("  Failed to load: {e}");
            None
        }
    }
}

fn ensure_loaded(state: &mut ReplState) -> Option<&Recommender> {
    if state.recommender.is_none() {
        let path = resolve_catalog_path(None);
        match Catalog::from_path(&path) {
            Ok(catalog) => {
                state.recommender = Some(Recommender::new(Arc::new(catalog)));
                state.catalog_path = Some(path);
            }
            Err(e) => {
                eprintln!("  No catalog loaded ({e}). Use /load <file.csv>.");
                return None;
            }
        }
    }
    state.recommender.as_ref()
}

fn cmd_recommend(args: &str, state: &mut ReplState) {
    let (name, top_n) = match parse_recommend_args(args) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("  {msg}");
            return;
        }
    };
    let Some(recommender) = ensure_loaded(state) else {
        return;
    };

    let items = recommender.recommend(&name, top_n);
    eprintln!();
    if items.is_empty() {
        eprintln!("  {NO_RECOMMENDATIONS_MESSAGE}");
    } else {
        for (rank, item) in items.iter().enumerate() {
            eprintln!(
                "  {:>3}. {:<48} {:>6.3}  {}",
                rank + 1,
                shopwise::truncate(&item.name, 45),
                item.similarity,
                item.brand
            );
        }
    }
    eprintln!();
}

fn cmd_trending(args: &str) {
    let path = if args.is_empty() {
        resolve_trending_path(None)
    } else {
        args.to_string()
    };

    match Catalog::from_path(&path) {
        Ok(catalog) => {
            let listing = trending_listing(
                &catalog,
                TRENDING_LIMIT,
                &RandomImageProvider,
                &RandomPriceProvider,
            );
            eprintln!();
            for product in &listing.products {
                eprintln!(
                    "    {:<16} {:<20} {}",
                    product.short_name, product.brand, product.image_url
                );
            }
            eprintln!("  Price: ${}", listing.price);
            eprintln!();
        }
        Err(e) => eprintln!("  Cannot read trending catalog: {e}"),
    }
}

fn cmd_stats(state: &mut ReplState) {
    let Some(recommender) = ensure_loaded(state) else {
        return;
    };
    let catalog = recommender.catalog().clone();
    let space = shopwise::build_model(&catalog);

    eprintln!();
    eprintln!(
        "  Catalog: {}",
        state.catalog_path.as_deref().unwrap_or("(unknown)")
    );
    eprintln!("    Products:   {}", catalog.len());
    eprintln!("    Vocabulary: {}", space.n_terms());
    eprintln!();
}
