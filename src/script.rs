//! Navigation scripts: a line-oriented command language replayed against the
//! in-memory host.
//!
//! ```text
//! # comment
//! present Detail
//! nest Tabs 2
//! add 1 Home
//! add-multiple 2 Feed Search
//! back 1
//! complete
//! ```
//!
//! `nest` and `present` are declarations: they describe how a unit is built
//! and apply wherever they appear in the script.

use crate::config::BackstackConfig;
use crate::controller::NavigationController;
use crate::error::NavigationError;
use crate::memory::{HookEvent, ManualAnimator, MemoryResolver, MemoryUnit, RecordingHooks};
use crate::registry::ContainerRegistry;
use crate::transaction::NotificationKind;
use crate::types::{ContainerId, Tag};
use crate::unit::Unit;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Add { container: ContainerId, tag: Tag },
    AddMultiple { container: ContainerId, tags: Vec<Tag> },
    Replace { container: ContainerId, tag: Tag, clear_stack: bool },
    Back { container: ContainerId, to_tag: Option<Tag> },
    Pop { container: ContainerId },
    PopAll { container: ContainerId },
    Remove { container: ContainerId, tag: Tag },
    Nest { tag: Tag, container: ContainerId },
    Present { tag: Tag },
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number in the source
    pub line: usize,
    pub text: String,
    pub command: ScriptCommand,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    lines: Vec<ScriptLine>,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self, NavigationError> {
        let mut lines = Vec::new();
        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let text = strip_comment(raw).trim();
            if text.is_empty() {
                continue;
            }
            let command = parse_command(text).map_err(|message| NavigationError::Script { line, message })?;
            lines.push(ScriptLine {
                line,
                text: text.to_string(),
                command,
            });
        }
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[ScriptLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn strip_comment(raw: &str) -> &str {
    match raw.find('#') {
        Some(pos) => &raw[..pos],
        None => raw,
    }
}

fn parse_command(text: &str) -> Result<ScriptCommand, String> {
    let mut words = text.split_whitespace();
    let keyword = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let command = match keyword {
        "add" => {
            expect_args(keyword, &args, 2, 2)?;
            ScriptCommand::Add {
                container: parse_container(args[0])?,
                tag: args[1].to_string(),
            }
        }
        "add-multiple" => {
            if args.len() < 2 {
                return Err("add-multiple expects a container and at least one tag".to_string());
            }
            ScriptCommand::AddMultiple {
                container: parse_container(args[0])?,
                tags: args[1..].iter().map(|t| t.to_string()).collect(),
            }
        }
        "replace" => {
            let clear_stack = args.contains(&"--clear");
            let positional: Vec<&str> = args.iter().copied().filter(|a| *a != "--clear").collect();
            if let Some(flag) = positional.iter().find(|a| a.starts_with("--")) {
                return Err(format!("unknown flag '{}'", flag));
            }
            expect_args(keyword, &positional, 2, 2)?;
            ScriptCommand::Replace {
                container: parse_container(positional[0])?,
                tag: positional[1].to_string(),
                clear_stack,
            }
        }
        "back" => {
            expect_args(keyword, &args, 1, 2)?;
            ScriptCommand::Back {
                container: parse_container(args[0])?,
                to_tag: args.get(1).map(|t| t.to_string()),
            }
        }
        "pop" => {
            expect_args(keyword, &args, 1, 1)?;
            ScriptCommand::Pop {
                container: parse_container(args[0])?,
            }
        }
        "pop-all" => {
            expect_args(keyword, &args, 1, 1)?;
            ScriptCommand::PopAll {
                container: parse_container(args[0])?,
            }
        }
        "remove" => {
            expect_args(keyword, &args, 2, 2)?;
            ScriptCommand::Remove {
                container: parse_container(args[0])?,
                tag: args[1].to_string(),
            }
        }
        "nest" => {
            expect_args(keyword, &args, 2, 2)?;
            ScriptCommand::Nest {
                tag: args[0].to_string(),
                container: parse_container(args[1])?,
            }
        }
        "present" => {
            expect_args(keyword, &args, 1, 1)?;
            ScriptCommand::Present {
                tag: args[0].to_string(),
            }
        }
        "complete" => {
            expect_args(keyword, &args, 0, 0)?;
            ScriptCommand::Complete
        }
        other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(command)
}

fn expect_args(keyword: &str, args: &[&str], min: usize, max: usize) -> Result<(), String> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{} to {}", min, max)
        };
        return Err(format!("{} expects {} argument(s), got {}", keyword, expected, args.len()));
    }
    Ok(())
}

fn parse_container(word: &str) -> Result<ContainerId, String> {
    word.parse::<u32>()
        .map(ContainerId)
        .map_err(|_| format!("invalid container id '{}'", word))
}

/// How the runner builds the unit for a tag.
#[derive(Debug, Clone, Default)]
struct UnitShape {
    presented: bool,
    embeds: Vec<ContainerId>,
}

/// Outcome of a replay.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub transcript: Vec<String>,
    pub registry: ContainerRegistry,
    pub pending_animations: usize,
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.transcript {
            writeln!(f, "{}", entry)?;
        }
        writeln!(f, "---")?;
        for container in self.registry.container_ids() {
            writeln!(f, "stack {}: [{}]", container, self.registry.stack(container).join(", "))?;
        }
        write!(f, "pending animations: {}", self.pending_animations)
    }
}

/// Replays scripts against a controller wired to the in-memory host.
pub struct ScriptRunner {
    controller: NavigationController<MemoryResolver, RecordingHooks>,
    animator: ManualAnimator,
    shapes: HashMap<Tag, UnitShape>,
    transcript: Vec<String>,
}

impl ScriptRunner {
    pub fn new(config: &BackstackConfig) -> Self {
        let animator = ManualAnimator::new();
        let controller = NavigationController::from_config(MemoryResolver::new(), RecordingHooks::new(), config)
            .with_animator(animator.clone());
        Self {
            controller,
            animator,
            shapes: HashMap::new(),
            transcript: Vec::new(),
        }
    }

    pub fn controller(&self) -> &NavigationController<MemoryResolver, RecordingHooks> {
        &self.controller
    }

    pub fn run(mut self, script: &Script) -> ReplayReport {
        for line in script.lines() {
            match &line.command {
                ScriptCommand::Nest { tag, container } => {
                    self.shapes.entry(tag.clone()).or_default().embeds.push(*container);
                }
                ScriptCommand::Present { tag } => {
                    self.shapes.entry(tag.clone()).or_default().presented = true;
                }
                _ => {}
            }
        }
        info!(commands = script.len(), declared = self.shapes.len(), "Replaying navigation script");

        for line in script.lines() {
            self.transcript.push(format!("{:>3}: {}", line.line, line.text));
            self.execute(&line.command);
            self.record_hook_events();
        }

        ReplayReport {
            transcript: self.transcript,
            registry: self.controller.snapshot(),
            pending_animations: self.controller.pending_animations(),
        }
    }

    fn execute(&mut self, command: &ScriptCommand) {
        debug!(?command, "Executing script command");
        match command {
            ScriptCommand::Add { container, tag } => {
                let unit = self.build_unit(tag);
                self.controller.add(*container, unit);
            }
            ScriptCommand::AddMultiple { container, tags } => {
                let units = tags.iter().map(|tag| self.build_unit(tag)).collect();
                self.controller.add_multiple(*container, units);
            }
            ScriptCommand::Replace {
                container,
                tag,
                clear_stack,
            } => {
                let unit = self.build_unit(tag);
                self.controller.replace(*container, unit, *clear_stack);
            }
            ScriptCommand::Back { container, to_tag } => {
                self.controller.back(*container, to_tag.as_deref());
            }
            ScriptCommand::Pop { container } => self.controller.pop(*container),
            ScriptCommand::PopAll { container } => self.controller.pop_all(*container),
            ScriptCommand::Remove { container, tag } => self.controller.remove(*container, tag),
            ScriptCommand::Nest { .. } | ScriptCommand::Present { .. } => {}
            ScriptCommand::Complete => {
                let fired = self.animator.finish_all();
                let ran = self.controller.process_animations();
                self.transcript
                    .push(format!("     completed {} animation(s), ran {} continuation(s)", fired, ran));
            }
        }
    }

    fn build_unit(&self, tag: &str) -> Box<dyn Unit> {
        let mut unit = MemoryUnit::new(tag);
        if let Some(shape) = self.shapes.get(tag) {
            if shape.presented {
                unit = unit.presented();
            }
            for container in &shape.embeds {
                unit = unit.embedding(*container);
            }
        }
        Box::new(unit)
    }

    fn record_hook_events(&mut self) {
        let events = self.controller.hooks().log().to_vec();
        self.controller.hooks_mut().clear();
        for event in events {
            let entry = match event {
                HookEvent::LastUnitBack(container) => format!("     last-unit-back {}", container),
                HookEvent::Notified(notification) => {
                    let kind = match notification.kind {
                        NotificationKind::Added => "added",
                        NotificationKind::Removed => "removed",
                    };
                    format!("     {} {} [{}]", kind, notification.container, notification.tags.join(", "))
                }
            };
            self.transcript.push(entry);
        }
    }
}
