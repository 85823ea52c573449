//! Fugu CLI - コマンドラインインターフェース
//!
//! 値サマリーを単発で表示するサブコマンドと、メモリイメージを読み込んで値を調べるREPL

mod command;
mod parse;

use anyhow::Result;
use clap::{Parser, Subcommand};
use command::Command;
use fugu_core::{RenderConfig, SummaryKind, SummaryRegistry, DEFAULT_MAX_STRING_LENGTH};
use fugu_target::{
    read_managed_string, read_rpc_header, read_string_view, read_vector256, RpcHeaderLayout,
    SnapshotMemory, ValueNode,
};
use parse::{parse_address, parse_kind};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Fugu - Debugger Value Summaries
#[derive(Parser)]
#[command(name = "fugu")]
#[command(version = "0.1.0")]
#[command(about = "Readable summaries for SIMD registers, managed strings and RPC headers", long_about = None)]
struct Cli {
    /// Maximum number of characters shown for managed strings
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_STRING_LENGTH)]
    max_length: usize,

    #[command(subcommand)]
    command: FuguCommand,
}

#[derive(Subcommand)]
enum FuguCommand {
    /// Split a 256-bit register into two 128-bit lanes
    Vector {
        /// Four 64-bit words, lowest first (hex with 0x or decimal)
        #[arg(num_args = 4, required = true)]
        words: Vec<String>,
    },

    /// Render a length-prefixed managed string
    String {
        /// Logical size of the string
        size: u32,

        /// Backing characters
        #[arg(default_value = "")]
        text: String,
    },

    /// Render an RPC header; use '-' for a field that is not loaded yet
    Rpc {
        /// Protocol version field
        version: String,

        /// Method name field
        method: String,
    },

    /// Inspect values in a memory image interactively
    Repl {
        /// Memory image to load at startup
        #[arg(short, long)]
        image: Option<String>,

        /// Base address of the image
        #[arg(short, long)]
        base: Option<String>,
    },
}

/// REPLの状態
struct Session {
    memory: SnapshotMemory,
    registry: SummaryRegistry,
    layout: RpcHeaderLayout,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = RenderConfig {
        max_string_length: cli.max_length,
    };
    let mut session = Session {
        memory: SnapshotMemory::new(),
        registry: SummaryRegistry::with_defaults(&config)?,
        layout: RpcHeaderLayout::default(),
    };

    match cli.command {
        FuguCommand::Vector { words } => handle_vector(&session, &words)?,
        FuguCommand::String { size, text } => {
            print_value(&session.registry, "string", &managed_string_literal(size, &text));
        }
        FuguCommand::Rpc { version, method } => handle_rpc(&session, &version, &method),
        FuguCommand::Repl { image, base } => {
            println!("Fugu - Debugger Value Summaries");
            println!("Version 0.1.0");
            println!();

            if let Some(path) = image {
                handle_load(&mut session, &path, base.as_deref())?;
            }
            run_repl(&mut session)?;
        }
    }

    Ok(())
}

/// REPLループを実行する
fn run_repl(session: &mut Session) -> Result<()> {
    println!("Type 'help' for available commands, 'quit' to exit.");
    println!();

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline("(fugu) ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line)?;

                match handle_command(session, line) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

/// コマンドを処理する（終了する場合は true）
fn handle_command(session: &mut Session, line: &str) -> Result<bool> {
    match Command::parse(line) {
        Some(Command::Help) => print_help(),
        Some(Command::Quit) => {
            println!("Goodbye!");
            return Ok(true);
        }
        Some(Command::Load { path, base }) => handle_load(session, &path, base.as_deref())?,
        Some(Command::Print { kind, address }) => handle_print(session, &kind, &address)?,
        Some(Command::Child {
            kind,
            address,
            name,
        }) => handle_child(session, &kind, &address, &name)?,
        Some(Command::Vector(words)) => handle_vector(session, &words)?,
        Some(Command::Str { size, text }) => {
            let size: u32 = size
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid size '{}': {}", size, e))?;
            print_value(&session.registry, "string", &managed_string_literal(size, &text));
        }
        Some(Command::Rpc { version, method }) => handle_rpc(session, &version, &method),
        Some(Command::Regions) => print_regions(&session.memory),
        Some(Command::Categories) => print_categories(&session.registry),
        Some(Command::Enable(name)) => {
            session.registry.enable(&name)?;
            println!("Category '{}' enabled", name);
        }
        Some(Command::Disable(name)) => {
            session.registry.disable(&name)?;
            println!("Category '{}' disabled", name);
        }
        None => {
            println!("Unknown command: {}", line);
            println!("Type 'help' for available commands.");
        }
    }

    Ok(false)
}

/// Loadコマンドを処理する
fn handle_load(session: &mut Session, path: &str, base: Option<&str>) -> Result<()> {
    let base = base.map(parse_address).transpose()?.unwrap_or(0);
    session.memory.load(path, base)?;
    println!("Loaded {} at 0x{:x}", path, base);
    Ok(())
}

/// 型指定とアドレスから値を読み取る
fn read_node(session: &Session, kind: &str, address: &str) -> Result<(u64, ValueNode)> {
    let kind = parse_kind(kind, &session.registry)?;
    let addr = parse_address(address)?;
    if !session.memory.is_mapped(addr) {
        return Err(anyhow::anyhow!("Address 0x{:x} is not mapped", addr));
    }
    debug!("read {:?} at 0x{:x}", kind, addr);

    let node = match kind {
        SummaryKind::Vector256 | SummaryKind::VectorLanes | SummaryKind::VectorWords => {
            read_vector256(&session.memory, addr)?
        }
        SummaryKind::ManagedString => read_managed_string(&session.memory, addr)?,
        SummaryKind::StringView => read_string_view(&session.memory, addr)?,
        SummaryKind::RpcHeader => read_rpc_header(&session.memory, addr, &session.layout)?,
    };
    Ok((addr, node))
}

/// Printコマンドを処理する
fn handle_print(session: &Session, kind: &str, address: &str) -> Result<()> {
    let (addr, node) = read_node(session, kind, address)?;
    print_value(&session.registry, &format!("0x{:x}", addr), &node);
    Ok(())
}

/// Childコマンドを処理する
fn handle_child(session: &Session, kind: &str, address: &str, name: &str) -> Result<()> {
    let (addr, node) = read_node(session, kind, address)?;
    match session.registry.child_named(&node, name) {
        Some((child, text)) => println!("(0x{:x}) {} = \"{}\"", addr, child, text),
        None => println!("No child '{}' at 0x{:x}", name, addr),
    }
    Ok(())
}

/// Vectorコマンドを処理する
fn handle_vector(session: &Session, words: &[String]) -> Result<()> {
    if words.len() != 4 {
        return Err(anyhow::anyhow!("Expected 4 words, got {}", words.len()));
    }

    let mut parsed = [0u64; 4];
    for (word, text) in parsed.iter_mut().zip(words) {
        *word = parse_address(text)?;
    }

    print_value(&session.registry, "vector", &ValueNode::vector256(parsed));
    Ok(())
}

/// Rpcコマンドを処理する
fn handle_rpc(session: &Session, version: &str, method: &str) {
    let field = |text: &str| {
        if text == "-" {
            managed_string_literal(0, "")
        } else {
            managed_string_literal(text.len() as u32, text)
        }
    };

    let header = ValueNode::rpc_header(field(version), field(method));
    print_value(&session.registry, "header", &header);
}

/// リテラルから管理文字列ノードを作る
fn managed_string_literal(size: u32, text: &str) -> ValueNode {
    let bytes = if size == 0 {
        None
    } else {
        Some(text.as_bytes().to_vec())
    };
    ValueNode::managed_string(0, size, bytes)
}

/// 値のサマリーと合成子要素を表示する
fn print_value(registry: &SummaryRegistry, label: &str, node: &ValueNode) {
    match registry.summarize(node) {
        Some(summary) => println!("({}) {} = {}", node.type_name, label, summary),
        None => println!("({}) {} = <{}>", node.type_name, label, node.type_name),
    }

    if let Some(children) = registry.children(node) {
        for (name, text) in children {
            println!("  {} = \"{}\"", name, text);
        }
    }
}

fn print_regions(memory: &SnapshotMemory) {
    if memory.regions().is_empty() {
        println!("No regions mapped");
        return;
    }

    println!("Mapped regions ({}):", memory.regions().len());
    for region in memory.regions() {
        println!(
            "  0x{:x}-0x{:x} ({} bytes)",
            region.base,
            region.end(),
            region.bytes.len()
        );
    }
}

fn print_categories(registry: &SummaryRegistry) {
    println!("Categories (highest priority first):");
    for category in registry.categories() {
        let state = if category.is_enabled() { "enabled" } else { "disabled" };
        println!("  {} ({}, {} entries)", category.name(), state, category.len());
    }
}

fn print_help() {
    println!("Available commands:");
    println!();
    println!("  help                   - Show this help message");
    println!("  quit/exit/q            - Exit");
    println!();
    println!("Memory commands:");
    println!("  load <file> [base]     - Map a memory image at base (default 0)");
    println!("  regions                - List mapped regions");
    println!("  print <kind> <addr>    - Summarize a value (m256, string, view, rpc)");
    println!("  child <kind> <addr> <[n]> - Show one synthetic child by index name");
    println!();
    println!("Literal commands:");
    println!("  vector <w0> <w1> <w2> <w3> - Split four 64-bit words into lanes");
    println!("  string <size> [text]   - Render a managed string");
    println!("  rpc <version> <method> - Render an RPC header ('-' = not loaded)");
    println!();
    println!("Category commands:");
    println!("  categories             - List summary categories");
    println!("  enable <name>          - Enable a category and give it priority");
    println!("  disable <name>         - Disable a category");
    println!();
    println!("Examples:");
    println!("  load heap.bin 0x7f0000000000");
    println!("  print rpc 0x7f0000000040");
    println!("  child m256 0x7f0000000080 [1]");
    println!("  vector 0x0102030405060708 0 0 0");
    println!("  disable avx2");
}
