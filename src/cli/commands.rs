use crate::dom::document::{Document, NodeId};
use crate::dom::snapshot::load_snapshot;
use crate::dom::tree::DomTree;
use crate::error::LocatorError;
use crate::locator::Locator;
use crate::locator::record::LocatorRecord;
use crate::signals::text::{normalize_text, truncate_chars};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;
use crate::xpath::evaluator::find_element_by_xpath;

/// Shared state for one CLI invocation.
pub struct CommandContext {
    pub locator: Locator,
    pub tracer: TraceLogger,
    pub verbose: u8,
}

// ============================================================================
// xpath subcommand
// ============================================================================

/// Print a synthesized path. Returns whether one could be formed.
pub fn cmd_xpath(
    ctx: &CommandContext,
    snapshot: &str,
    at: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let doc = open_snapshot(ctx, snapshot)?;
    let node = select(&doc, at)?;

    let path = ctx.locator.generate_xpath(&doc, node);
    ctx.tracer.log(
        &TraceEvent::now("xpath")
            .with_matched(path.is_some())
            .with_note(describe_node(&doc, node)),
    );

    match &path {
        Some(p) => println!("{}", p),
        None => eprintln!("No stable path for {}", describe_node(&doc, node)),
    }
    Ok(path.is_some())
}

// ============================================================================
// find subcommand
// ============================================================================

pub fn cmd_find(
    ctx: &CommandContext,
    snapshot: &str,
    xpath: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let doc = open_snapshot(ctx, snapshot)?;
    let found = find_element_by_xpath(&doc, xpath);
    ctx.tracer.log(
        &TraceEvent::now("find")
            .with_matched(found.is_some())
            .with_note(xpath),
    );

    match found {
        Some(node) => println!("{}", describe_node(&doc, node)),
        None => eprintln!("No element matches {}", xpath),
    }
    Ok(found.is_some())
}

// ============================================================================
// record subcommand
// ============================================================================

pub fn cmd_record(
    ctx: &CommandContext,
    snapshot: &str,
    at: &str,
    output: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = open_snapshot(ctx, snapshot)?;
    let node = select(&doc, at)?;

    let record = ctx.locator.generate_locator(&doc, node);
    ctx.tracer.log(
        &TraceEvent::now("record")
            .with_record(&record)
            .with_matched(true)
            .with_note(describe_node(&doc, node)),
    );

    if ctx.verbose > 0 {
        eprintln!(
            "Recorded {} (tier {}, fallback path: {})",
            describe_node(&doc, node),
            record.stability_level,
            record.xpath_fallback.as_deref().unwrap_or("none")
        );
    }

    let json = record.to_json()?;
    match output {
        Some(path) => std::fs::write(path, &json)?,
        None => println!("{}", json),
    }
    Ok(())
}

// ============================================================================
// locate subcommand
// ============================================================================

pub fn cmd_locate(
    ctx: &CommandContext,
    snapshot: &str,
    record_path: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let doc = open_snapshot(ctx, snapshot)?;
    let record = load_record(record_path)?;

    let located = ctx.locator.locate_node(&doc, &record)?;
    let mut event = TraceEvent::now("locate")
        .with_record(&record)
        .with_matched(located.is_some());
    if let Some(l) = &located {
        event = event.with_strategy(&l.strategy);
    }
    ctx.tracer.log(&event);

    match located {
        Some(l) => {
            println!("{}", describe_node(&doc, l.node));
            if ctx.verbose > 0 {
                eprintln!("  matched by {}", l.strategy);
            }
            Ok(true)
        }
        None => {
            eprintln!("Record {} not found", record.fingerprint());
            Ok(false)
        }
    }
}

// ============================================================================
// rank subcommand
// ============================================================================

pub fn cmd_rank(
    ctx: &CommandContext,
    snapshot: &str,
    record_path: &str,
    limit: usize,
) -> Result<bool, Box<dyn std::error::Error>> {
    let doc = open_snapshot(ctx, snapshot)?;
    let record = load_record(record_path)?;

    let candidates = ctx.locator.locate_all_nodes(&doc, &record, limit)?;
    ctx.tracer.log(
        &TraceEvent::now("rank")
            .with_record(&record)
            .with_matched(!candidates.is_empty())
            .with_candidates(candidates.len(), candidates.first().map(|c| c.score)),
    );

    for (i, c) in candidates.iter().enumerate() {
        println!("{:>2}. {:>6.2}  {}", i + 1, c.score, describe_node(&doc, c.node));
        if ctx.verbose > 1 {
            eprintln!("      {:?}", c.breakdown);
        }
    }
    if candidates.is_empty() {
        eprintln!("No candidates for record {}", record.fingerprint());
    }
    Ok(!candidates.is_empty())
}

// ============================================================================
// Helpers
// ============================================================================

fn open_snapshot(ctx: &CommandContext, source: &str) -> Result<Document, LocatorError> {
    if ctx.verbose > 0 {
        eprintln!("Loading snapshot from {}...", source);
    }
    load_snapshot(source)
}

fn select(doc: &Document, expression: &str) -> Result<NodeId, LocatorError> {
    find_element_by_xpath(doc, expression).ok_or_else(|| LocatorError::NodeNotFound {
        expression: expression.to_string(),
    })
}

pub fn load_record(path: &str) -> Result<LocatorRecord, LocatorError> {
    let content = std::fs::read_to_string(path).map_err(|source| LocatorError::Io {
        path: path.to_string(),
        source,
    })?;
    let record = LocatorRecord::from_json(&content)?;
    record.validate()?;
    Ok(record)
}

/// One-line summary: `<tag attr="v" ...> "text"`.
pub fn describe_node<T: DomTree>(tree: &T, node: T::Node) -> String {
    let mut out = format!("<{}", tree.tag(node));
    for (name, value) in tree.attributes(node) {
        out.push_str(&format!(" {}=\"{}\"", name, value));
    }
    out.push('>');
    if let Some(text) = normalize_text(&tree.own_text(node)) {
        out.push_str(&format!(" \"{}\"", truncate_chars(&text, 40)));
    }
    out
}
