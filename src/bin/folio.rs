use clap::{Parser, Subcommand, ValueEnum};
use folio::config::{EditorConfig, config_file_path};
use folio::richtext::markdown::{document_to_markdown, markdown_to_document};
use folio::richtext::registry::{NodeRecord, NodeRegistry};
use folio::richtext::{Document, Editor, InputEvent, MemoryHost, Position, Range, SurfaceId};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Structured rich-text documents", long_about = None)]
struct Args {
    /// Config file (defaults to folio.toml in the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty document
    New {
        path: PathBuf,
        /// Title stored with the document
        #[arg(long)]
        title: Option<String>,
    },
    /// Print the node structure of a document
    Show { path: PathBuf },
    /// Print the document title
    Title { path: PathBuf },
    /// Convert a markdown file into a document
    Import { markdown: PathBuf, output: PathBuf },
    /// Print a document as markdown or plain text
    Export {
        path: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Format::Markdown)]
        format: Format,
    },
    /// Replay an input script against a document and save the result
    Edit {
        path: PathBuf,
        /// Script with one action per line: select, key, type, paste, insert, undo, redo
        #[arg(long)]
        script: PathBuf,
        /// Write the result here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the active settings to the config file
    Config {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Markdown,
    Text,
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path.display(), e))
}

fn load_document(path: &Path) -> Result<Document, String> {
    Document::from_json(&read_file(path)?, &NodeRegistry::new())
        .map_err(|e| format!("Failed to load '{}': {}", path.display(), e))
}

fn load_editor(path: &Path, config: &EditorConfig) -> Result<Editor, String> {
    Editor::load(
        &read_file(path)?,
        NodeRegistry::new(),
        MemoryHost::shared(),
        config,
    )
    .map_err(|e| format!("Failed to load '{}': {}", path.display(), e))
}

fn save_document(path: &Path, doc: &Document) -> Result<(), String> {
    let json = doc.to_json().map_err(|e| e.to_string())?;
    fs::write(path, json + "\n")
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))
}

fn cmd_new(path: &Path, title: Option<String>) -> Result<(), String> {
    if path.exists() {
        return Err(format!("'{}' already exists", path.display()));
    }
    let doc = Document::default();
    let doc = match title {
        Some(title) => doc.with_title(title),
        None => doc,
    };
    save_document(path, &doc)
}

fn cmd_show(path: &Path, config: &EditorConfig) -> Result<(), String> {
    let editor = load_editor(path, config)?;
    println!("{}", editor.root());
    Ok(())
}

fn cmd_title(path: &Path) -> Result<(), String> {
    let doc = load_document(path)?;
    match doc.title() {
        Some(title) => println!("{}", title),
        None => println!("(untitled)"),
    }
    Ok(())
}

fn cmd_import(markdown: &Path, output: &Path) -> Result<(), String> {
    let doc = markdown_to_document(&read_file(markdown)?);
    info!("imported {} nodes", doc.nodes().len());
    save_document(output, &doc)
}

fn cmd_export(path: &Path, format: Format) -> Result<(), String> {
    let doc = load_document(path)?;
    match format {
        Format::Markdown => println!("{}", document_to_markdown(&doc)),
        Format::Text => println!("{}", doc.to_plain_text()),
    }
    Ok(())
}

fn cmd_edit(
    path: &Path,
    script: &Path,
    output: Option<&Path>,
    config: &EditorConfig,
) -> Result<(), String> {
    let script = read_file(script)?;
    let mut editor = load_editor(path, config)?;
    for (number, line) in script.lines().enumerate() {
        run_action(&mut editor, line).map_err(|e| format!("line {}: {}", number + 1, e))?;
    }

    save_document(output.unwrap_or(path), &editor.document())
}

fn cmd_config(explicit: Option<&Path>, force: bool, config: &EditorConfig) -> Result<(), String> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_file_path()
            .ok_or_else(|| "No config directory for this user".to_string())?,
    };
    if path.exists() && !force {
        return Err(format!("'{}' already exists (use --force)", path.display()));
    }
    config
        .save(&path)
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    println!("{}", path.display());
    Ok(())
}

fn parse_position(text: &str) -> Result<Position, String> {
    let (index, offset) = text
        .split_once(':')
        .ok_or_else(|| format!("expected index:offset, got '{}'", text))?;
    let index = index.parse().map_err(|_| format!("bad index '{}'", index))?;
    let offset = offset.parse().map_err(|_| format!("bad offset '{}'", offset))?;
    Ok(Position::new(index, offset))
}

/// Run one script line against the editor
fn run_action(editor: &mut Editor, line: &str) -> Result<(), String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(());
    }
    let (action, rest) = line.split_once(' ').unwrap_or((line, ""));

    match action {
        "select" => {
            let mut positions = rest.split_whitespace().map(parse_position);
            let start = positions
                .next()
                .ok_or_else(|| "select needs a position".to_string())??;
            let end = positions.next().transpose()?.unwrap_or(start);
            editor
                .select(Range::new(SurfaceId::ROOT, start, end))
                .map_err(|e| e.to_string())?;
        }
        "key" => {
            editor
                .dispatch(&InputEvent::key(rest.trim()))
                .map_err(|e| e.to_string())?;
        }
        "type" => {
            for ch in rest.chars() {
                editor
                    .dispatch(&InputEvent::keypress(ch))
                    .map_err(|e| e.to_string())?;
            }
        }
        "paste" => {
            let text = rest.replace("\\n", "\n");
            editor
                .dispatch(&InputEvent::paste(text))
                .map_err(|e| e.to_string())?;
        }
        "insert" => {
            let (index, json) = rest
                .split_once(' ')
                .ok_or_else(|| "insert needs an index and a node record".to_string())?;
            let index = index.parse().map_err(|_| format!("bad index '{}'", index))?;
            let record: NodeRecord =
                serde_json::from_str(json).map_err(|e| format!("bad node record: {}", e))?;
            editor
                .insert_record(SurfaceId::ROOT, index, &record)
                .map_err(|e| e.to_string())?;
        }
        "undo" => {
            editor.undo().map_err(|e| e.to_string())?;
        }
        "redo" => {
            editor.redo().map_err(|e| e.to_string())?;
        }
        other => return Err(format!("unknown action '{}'", other)),
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let config = match EditorConfig::resolve(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Commands::New { path, title } => cmd_new(&path, title),
        Commands::Show { path } => cmd_show(&path, &config),
        Commands::Title { path } => cmd_title(&path),
        Commands::Import { markdown, output } => cmd_import(&markdown, &output),
        Commands::Export { path, format } => cmd_export(&path, format),
        Commands::Edit {
            path,
            script,
            output,
        } => cmd_edit(&path, &script, output.as_deref(), &config),
        Commands::Config { force } => cmd_config(args.config.as_deref(), force, &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio::richtext::Node;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("folio-cli-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_config_command_writes_once() {
        let path = temp_path("init/folio.toml");
        let mut config = EditorConfig::default();
        config.history_limit = 12;

        cmd_config(Some(&path), false, &config).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap(), config);

        assert!(cmd_config(Some(&path), false, &EditorConfig::default()).is_err());
        cmd_config(Some(&path), true, &EditorConfig::default()).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_script_actions() {
        let doc = Document::new(vec![Node::paragraph("ab")]);
        let config = EditorConfig::default();
        let mut editor = Editor::new(doc, NodeRegistry::new(), MemoryHost::shared(), &config);

        for line in [
            "# comment",
            "select 0:1",
            "key Enter",
            r#"insert 1 {"type": "divider"}"#,
            "select 0:1",
            r"paste x\ny",
        ] {
            run_action(&mut editor, line).unwrap();
        }
        assert_eq!(editor.root().texts(), vec!["ax", "y", "", "b"]);
        assert_eq!(editor.root().nodes()[2].type_id(), "divider");

        run_action(&mut editor, "undo").unwrap();
        assert_eq!(editor.root().texts(), vec!["a", "", "b"]);
        assert!(run_action(&mut editor, "insert 0 {\"type\": \"table\"}").is_err());
        assert!(run_action(&mut editor, "jump 3").is_err());
    }
}
