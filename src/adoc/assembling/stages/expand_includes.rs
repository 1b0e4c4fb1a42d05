//! Include expansion stage
//!
//!     Replaces every `include::target[]` with the content of its target, parsed at the
//!     point of inclusion. Included files may include further files; each level resolves
//!     relative targets against the directory of the file that holds the directive, and
//!     the chain is cut at `max_include_depth` so that a file including itself ends in a
//!     warning instead of a stack overflow.
//!
//!     Supported directive attributes:
//!         lines=2..4;7      keep only the given (1-based, inclusive) lines; `-1` or an
//!                           empty end runs to the last line
//!         leveloffset=+1    shift the included headings; relative offsets accumulate
//!                           through nested includes, absolute ones replace the offset
//!         opts=optional     a missing target is dropped without a warning
//!
//!     Inside verbatim blocks a directive line is replaced by the raw lines of its target.
//!
//!     Include targets may reference attributes declared above the directive, so the stage
//!     tracks declarations as it walks. Headings spliced in are nested again afterwards:
//!     the whole tree is flattened to section markers, expanded, and re-nested.

use crate::adoc::assembling::{record, AttributeScope, Resolution};
use crate::adoc::ast::diagnostics::{Diagnostic, DiagnosticKind};
use crate::adoc::ast::elements::{Block, BlockContent, IncludeError, IncludeMacro, LevelOffset};
use crate::adoc::ast::range::Range;
use crate::adoc::config::ParseConfig;
use crate::adoc::includes::{resolve_path, FileResolver, ResolveError};
use crate::adoc::lexing::line_classification::BLOCK_MACRO;
use crate::adoc::parsing::attribute_list::macro_attributes;
use crate::adoc::parsing::{decode, parse_fragment, sections};
use crate::adoc::transforms::{Runnable, TransformError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const MIN_SECTION_LEVEL: i64 = 1;
const MAX_SECTION_LEVEL: i64 = 5;

pub struct ExpandIncludes {
    config: Arc<ParseConfig>,
    resolver: Arc<dyn FileResolver>,
}

impl ExpandIncludes {
    pub fn new(config: Arc<ParseConfig>, resolver: Arc<dyn FileResolver>) -> Self {
        Self { config, resolver }
    }
}

impl Runnable<Resolution, Resolution> for ExpandIncludes {
    fn run(&self, mut resolution: Resolution) -> Result<Resolution, TransformError> {
        if !self.config.passes.includes {
            debug!("include expansion skipped");
            return Ok(resolution);
        }

        let mut expander = Expander {
            config: &self.config,
            resolver: self.resolver.as_ref(),
            scope: AttributeScope::from_config(&self.config),
            warnings: Vec::new(),
            expanded: 0,
        };
        let root = Frame {
            depth: 0,
            base: self.config.base_dir.clone(),
            source: resolution.source_name.clone(),
            level_offset: 0,
        };

        let blocks = std::mem::take(&mut resolution.document.blocks);
        let blocks = expander.expand(sections::flatten(blocks), &root);
        resolution.document.blocks = sections::nest(blocks);

        debug!(
            expanded = expander.expanded,
            warnings = expander.warnings.len(),
            "expanded includes"
        );
        resolution.warnings.extend(expander.warnings);
        Ok(resolution)
    }
}

/// Where the blocks being expanded came from.
struct Frame {
    depth: usize,
    /// Directory relative targets are resolved against.
    base: PathBuf,
    /// File name for diagnostics, `None` for an unnamed main document.
    source: Option<String>,
    level_offset: i64,
}

enum Fetched {
    Text { target: String, text: String },
    Skipped,
    Failed { target: String, message: String },
}

struct Expander<'a> {
    config: &'a ParseConfig,
    resolver: &'a dyn FileResolver,
    scope: AttributeScope,
    warnings: Vec<Diagnostic>,
    expanded: usize,
}

impl Expander<'_> {
    fn expand(&mut self, blocks: Vec<Block>, frame: &Frame) -> Vec<Block> {
        let mut out = Vec::with_capacity(blocks.len());
        for block in blocks {
            match block {
                Block::Include(include) => out.extend(self.include_blocks(include, frame)),
                Block::AttributeDeclaration(declaration) => {
                    self.scope
                        .declare(&declaration.name, declaration.value.as_deref());
                    out.push(Block::AttributeDeclaration(declaration));
                }
                Block::List(mut list) => {
                    for item in &mut list.items {
                        let elements = std::mem::take(&mut item.elements);
                        item.elements = self.expand(elements, frame);
                    }
                    out.push(Block::List(list));
                }
                Block::Delimited(mut delimited) => {
                    let location = delimited.location.clone();
                    delimited.content = match delimited.content {
                        BlockContent::Blocks(blocks) => {
                            BlockContent::Blocks(self.expand(blocks, frame))
                        }
                        BlockContent::Verbatim(lines) => {
                            BlockContent::Verbatim(self.expand_lines(lines, &location, frame))
                        }
                    };
                    out.push(Block::Delimited(delimited));
                }
                other => out.push(other),
            }
        }
        out
    }

    fn include_blocks(&mut self, include: IncludeMacro, frame: &Frame) -> Vec<Block> {
        match self.fetch(&include, frame) {
            Fetched::Skipped => Vec::new(),
            Fetched::Failed { target, message } => vec![Block::IncludeError(IncludeError {
                target,
                message,
                location: include.location,
            })],
            Fetched::Text { target, text } => {
                let child = child_frame(frame, &target, &include);
                let (mut blocks, warnings) = parse_fragment(&text, &target);
                self.warnings.extend(warnings);
                shift_levels(&mut blocks, child.level_offset);
                self.expand(blocks, &child)
            }
        }
    }

    fn expand_lines(&mut self, lines: Vec<String>, location: &Range, frame: &Frame) -> Vec<String> {
        let mut out = Vec::with_capacity(lines.len());
        for line in lines {
            let Some(include) = include_directive(&line, location) else {
                out.push(line);
                continue;
            };
            match self.fetch(&include, frame) {
                Fetched::Skipped => {}
                Fetched::Failed { .. } => out.push(line),
                Fetched::Text { target, text } => {
                    let child = child_frame(frame, &target, &include);
                    let raw = text.lines().map(str::to_string).collect();
                    out.extend(self.expand_lines(raw, location, &child));
                }
            }
        }
        out
    }

    fn fetch(&mut self, include: &IncludeMacro, frame: &Frame) -> Fetched {
        let location = &include.location;
        let (target, unresolved) = self.scope.substitute(&include.target);
        for name in unresolved {
            self.report(location, DiagnosticKind::UnresolvedAttribute { name }, frame);
        }

        let max = self.config.max_include_depth;
        if frame.depth >= max {
            self.report(
                location,
                DiagnosticKind::IncludeDepthExceeded {
                    target: target.clone(),
                    max,
                },
                frame,
            );
            return Fetched::Failed {
                target,
                message: format!("include depth of {} exceeded", max),
            };
        }

        let bytes = match self.resolver.resolve(&target, &frame.base) {
            Ok(bytes) => bytes,
            Err(ResolveError::NotFound { .. }) if include.is_optional() => {
                debug!(target = %target, "skipped missing optional include");
                return Fetched::Skipped;
            }
            Err(err) => return self.fail(location, target, err.to_string(), frame),
        };
        let text = match decode(bytes) {
            Ok(text) => text,
            Err(err) => return self.fail(location, target, err.to_string(), frame),
        };
        let text = match include.attributes.get("lines") {
            Some(ranges) => select_lines(&text, ranges),
            None => text,
        };

        self.expanded += 1;
        debug!(target = %target, depth = frame.depth + 1, "including file");
        Fetched::Text { target, text }
    }

    fn fail(&mut self, location: &Range, target: String, message: String, frame: &Frame) -> Fetched {
        self.report(
            location,
            DiagnosticKind::IncludeFailed {
                target: target.clone(),
                message: message.clone(),
            },
            frame,
        );
        Fetched::Failed { target, message }
    }

    fn report(&mut self, location: &Range, kind: DiagnosticKind, frame: &Frame) {
        record(
            &mut self.warnings,
            location.clone(),
            kind,
            frame.source.as_deref(),
        );
    }
}

fn child_frame(frame: &Frame, target: &str, include: &IncludeMacro) -> Frame {
    let path = resolve_path(target, &frame.base);
    let base = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| frame.base.clone());
    let level_offset = match include.level_offset() {
        Some(LevelOffset::Relative(delta)) => frame.level_offset + delta,
        Some(LevelOffset::Absolute(offset)) => offset,
        None => frame.level_offset,
    };
    Frame {
        depth: frame.depth + 1,
        base,
        source: Some(target.to_string()),
        level_offset,
    }
}

/// Shift the headings of a flat fragment and clamp them to the section levels.
fn shift_levels(blocks: &mut [Block], offset: i64) {
    for block in blocks {
        if let Block::Section(section) = block {
            let level = (section.level as i64 + offset).clamp(MIN_SECTION_LEVEL, MAX_SECTION_LEVEL);
            section.level = level as usize;
        }
    }
}

/// An include directive written on a verbatim line.
fn include_directive(line: &str, location: &Range) -> Option<IncludeMacro> {
    let caps = BLOCK_MACRO.captures(line.trim_end())?;
    if &caps[1] != "include" || caps[2].is_empty() {
        return None;
    }
    Some(IncludeMacro {
        target: caps[2].to_string(),
        attributes: macro_attributes(&caps[3], &[]),
        location: location.clone(),
    })
}

/// Keep the lines selected by a `lines` attribute. Unparseable selections keep everything.
fn select_lines(text: &str, selection: &str) -> String {
    let ranges: Vec<(usize, Option<usize>)> = selection
        .split([';', ','])
        .filter_map(parse_line_range)
        .collect();
    if ranges.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        let selected = ranges
            .iter()
            .any(|(start, end)| number >= *start && end.map_or(true, |end| number <= end));
        if selected {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

fn parse_line_range(raw: &str) -> Option<(usize, Option<usize>)> {
    let raw = raw.trim();
    match raw.split_once("..") {
        Some((start, end)) => {
            let start = start.trim().parse().ok()?;
            let end = end.trim();
            if end.is_empty() || end == "-1" {
                Some((start, None))
            } else {
                Some((start, Some(end.parse().ok()?)))
            }
        }
        None => {
            let line = raw.parse().ok()?;
            Some((line, Some(line)))
        }
    }
}
