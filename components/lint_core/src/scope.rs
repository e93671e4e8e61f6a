//! Lexical scope tracking during the single parsing pass
//!
//! Frames live in an arena and are addressed by index, so a popped frame can
//! still be inspected. Names that do not resolve when referenced go into a
//! pending multimap; a later declaration can still claim them, and whatever
//! is left at [`ScopeTracker::finish`] becomes an undefined-name report or an
//! implied global.

use crate::globals::{GlobalChange, GlobalTable};
use crate::messages::Message;
use crate::options::{LateDefPolicy, OptionRegistry, ShadowPolicy, UnusedPolicy};
use crate::report::{ImpliedGlobal, UnusedBinding};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

/// Index of a frame in the arena
pub type FrameId = usize;

/// What opened a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Program level
    Global,
    /// Function body (parameters included)
    Function,
    /// Braced block or `for` head
    Block,
    /// `catch (e)` clause
    Catch,
    /// Labelled statement
    Label,
}

/// How a name was bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Param,
    Exception,
    /// Name of a named function expression, bound inside the function itself
    FunctionName,
    /// Declared by a `global` directive
    Global,
}

impl BindingKind {
    /// `var` and function declarations move to the function frame when
    /// their block closes
    pub fn hoists(self) -> bool {
        matches!(self, BindingKind::Var | BindingKind::Function)
    }

    fn is_lexical(self) -> bool {
        matches!(self, BindingKind::Let | BindingKind::Const)
    }
}

/// A declared name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Declared name
    pub name: String,
    /// Declaration line
    pub line: u32,
    /// Declaration column
    pub character: u32,
    /// How it was declared
    pub kind: BindingKind,
    /// Read at least once
    pub used: bool,
    /// Lines of every read
    pub use_lines: Vec<u32>,
    /// Moved to the function frame when its block closed
    pub hoisted_from_block: bool,
}

/// One scope frame
#[derive(Debug, Clone)]
pub struct Frame {
    /// What opened it
    pub kind: FrameKind,
    /// Enclosing frame
    pub parent: Option<FrameId>,
    /// Owning function (or global) frame; a function frame owns itself
    pub function: FrameId,
    /// Bindings in declaration order
    pub bindings: IndexMap<String, Binding>,
    /// Labels introduced by this frame
    pub labels: Vec<String>,
}

/// A finding produced by the tracker, drained by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// What was found
    pub message: Message,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub character: u32,
}

#[derive(Debug, Clone)]
struct PendingRef {
    line: u32,
    character: u32,
    frame: FrameId,
    function: FrameId,
    is_write: bool,
    undef: bool,
    latedef: LateDefPolicy,
}

#[derive(Debug, Clone)]
struct DirectiveGlobal {
    line: u32,
    character: u32,
    used: bool,
}

/// Results of [`ScopeTracker::finish`]
#[derive(Debug, Clone, Default)]
pub struct ScopeOutcome {
    /// Undeclared names referenced while `undef` was off, first reference first
    pub implieds: Vec<ImpliedGlobal>,
    /// Every binding the unused walk flagged, reported or not
    pub unused: Vec<UnusedBinding>,
    /// Names declared at global scope
    pub globals: Vec<String>,
}

/// Scope tracker for one run
pub struct ScopeTracker {
    frames: Vec<Frame>,
    stack: Vec<FrameId>,
    pending: IndexMap<String, Vec<PendingRef>>,
    predefined: GlobalTable,
    directive_globals: IndexMap<String, DirectiveGlobal>,
    exported: HashSet<String>,
    unused: Vec<UnusedBinding>,
    findings: Vec<Finding>,
}

impl ScopeTracker {
    /// Tracker holding only the global frame
    pub fn new(predefined: GlobalTable) -> Self {
        let global = Frame {
            kind: FrameKind::Global,
            parent: None,
            function: 0,
            bindings: IndexMap::new(),
            labels: Vec::new(),
        };
        Self {
            frames: vec![global],
            stack: vec![0],
            pending: IndexMap::new(),
            predefined,
            directive_globals: IndexMap::new(),
            exported: HashSet::new(),
            unused: Vec::new(),
            findings: Vec::new(),
        }
    }

    /// Innermost active frame
    pub fn current(&self) -> FrameId {
        self.stack.last().copied().unwrap_or(0)
    }

    /// Look a frame up in the arena
    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.frames.get(id)
    }

    /// Owning function frame of the innermost frame
    pub fn function_frame(&self) -> FrameId {
        self.frames[self.current()].function
    }

    /// True outside every function body
    pub fn in_global_code(&self) -> bool {
        self.function_frame() == 0
    }

    /// Number of active frames, the global one included
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The predefined global table
    pub fn predefined(&self) -> &GlobalTable {
        &self.predefined
    }

    /// The predefined global table, for directives that edit it
    pub fn predefined_mut(&mut self) -> &mut GlobalTable {
        &mut self.predefined
    }

    /// Take the findings produced since the last call
    pub fn take_findings(&mut self) -> Vec<Finding> {
        std::mem::take(&mut self.findings)
    }

    fn report(&mut self, message: Message, line: u32, character: u32) {
        self.findings.push(Finding {
            message,
            line,
            character,
        });
    }

    /// Push a new frame
    pub fn enter_scope(&mut self, kind: FrameKind) -> FrameId {
        let parent = self.current();
        let id = self.frames.len();
        let function = match kind {
            FrameKind::Function => id,
            _ => self.frames[parent].function,
        };
        self.frames.push(Frame {
            kind,
            parent: Some(parent),
            function,
            bindings: IndexMap::new(),
            labels: Vec::new(),
        });
        self.stack.push(id);
        trace!(frame = id, ?kind, "enter scope");
        id
    }

    /// Pop the innermost frame. Function frames are checked for unused
    /// bindings; other frames hand their `var`/function bindings to the
    /// function frame and have their `let`/`const` bindings checked.
    /// The global frame is never popped.
    pub fn exit_scope(&mut self, options: &OptionRegistry) -> Option<FrameId> {
        if self.stack.len() <= 1 {
            return None;
        }
        let id = self.stack.pop()?;
        trace!(frame = id, "exit scope");

        if self.frames[id].kind == FrameKind::Function {
            self.evaluate_unused(id, options.unused_policy(), false);
            return Some(id);
        }

        let function = self.frames[id].function;
        let hoisted: Vec<Binding> = self.frames[id]
            .bindings
            .values()
            .filter(|b| b.kind.hoists())
            .cloned()
            .collect();
        self.evaluate_unused(id, options.unused_policy(), true);

        for binding in hoisted {
            self.frames[id].bindings.shift_remove(&binding.name);
            self.hoist(function, binding, options.enabled("funcscope"));
        }
        Some(id)
    }

    fn hoist(&mut self, function: FrameId, binding: Binding, funcscope: bool) {
        let name = binding.name.clone();
        match self.frames[function].bindings.get_mut(&name) {
            Some(existing) => {
                existing.used |= binding.used;
                existing.use_lines.extend(binding.use_lines);
            }
            None => {
                let mut moved = binding;
                moved.hoisted_from_block = true;
                self.frames[function].bindings.insert(name.clone(), moved);
            }
        }

        // earlier references from elsewhere in the function now resolve
        let Some(refs) = self.pending.get_mut(&name) else {
            return;
        };
        let frames = &self.frames;
        let (claimed, rest): (Vec<PendingRef>, Vec<PendingRef>) = refs
            .drain(..)
            .partition(|r| is_within(frames, r.frame, function));
        *refs = rest;
        if refs.is_empty() {
            self.pending.shift_remove(&name);
        }
        for r in claimed {
            if !r.is_write {
                self.mark_used(function, &name, r.line);
            }
            if r.function == function && !funcscope {
                self.report(Message::OutOfScope(name.clone()), r.line, r.character);
            }
        }
    }

    /// Declare a name in the innermost frame (labels are skipped)
    pub fn declare(
        &mut self,
        name: &str,
        kind: BindingKind,
        line: u32,
        character: u32,
        options: &OptionRegistry,
    ) {
        let frame = self.declaration_frame();
        let shadow = options.shadow_policy();

        if kind.is_lexical() {
            if self.frames[frame].bindings.contains_key(name) {
                self.report(Message::AlreadyDeclared(name.to_string()), line, character);
                return;
            }
        } else if matches!(kind, BindingKind::Var | BindingKind::Function | BindingKind::Param) {
            self.check_redefinition(name, line, character, shadow);
        }

        if self.frames[frame].kind == FrameKind::Global
            && !matches!(kind, BindingKind::Exception | BindingKind::FunctionName)
            && self.predefined.contains(name)
            && shadow != ShadowPolicy::Allow
        {
            self.report(Message::Redefinition(name.to_string()), line, character);
        }

        if let Some(existing) = self.frames[frame].bindings.get(name) {
            if existing.kind != BindingKind::FunctionName {
                return;
            }
        }
        self.frames[frame].bindings.insert(
            name.to_string(),
            Binding {
                name: name.to_string(),
                line,
                character,
                kind,
                used: false,
                use_lines: Vec::new(),
                hoisted_from_block: false,
            },
        );

        self.claim_pending(name, frame, kind, line, character);
    }

    /// Innermost frame that is not a label
    fn declaration_frame(&self) -> FrameId {
        let mut id = self.current();
        while self.frames[id].kind == FrameKind::Label {
            match self.frames[id].parent {
                Some(parent) => id = parent,
                None => break,
            }
        }
        id
    }

    fn check_redefinition(&mut self, name: &str, line: u32, character: u32, shadow: ShadowPolicy) {
        if shadow == ShadowPolicy::Allow {
            return;
        }
        let function = self.function_frame();
        let mut cursor = Some(self.current());
        let mut inside = true;

        while let Some(id) = cursor {
            let frame = &self.frames[id];
            if let Some(existing) = frame.bindings.get(name) {
                if existing.kind == BindingKind::FunctionName {
                    return;
                }
                if inside {
                    self.report(Message::AlreadyDefined(name.to_string()), line, character);
                } else if shadow == ShadowPolicy::Outer {
                    self.report(Message::DefinedInOuterScope(name.to_string()), line, character);
                }
                return;
            }
            if id == function {
                inside = false;
                if shadow != ShadowPolicy::Outer {
                    return;
                }
            }
            cursor = frame.parent;
        }
    }

    fn claim_pending(&mut self, name: &str, frame: FrameId, kind: BindingKind, line: u32, character: u32) {
        let Some(refs) = self.pending.get_mut(name) else {
            return;
        };
        let frames = &self.frames;
        let (claimed, rest): (Vec<PendingRef>, Vec<PendingRef>) = refs
            .drain(..)
            .partition(|r| is_within(frames, r.frame, frame));
        *refs = rest;
        if refs.is_empty() {
            self.pending.shift_remove(name);
        }
        if claimed.is_empty() {
            return;
        }

        let function = self.frames[frame].function;
        let late = claimed.iter().any(|r| {
            r.function == function
                && match r.latedef {
                    LateDefPolicy::All => true,
                    LateDefPolicy::NoFunc => kind != BindingKind::Function,
                    LateDefPolicy::Off => false,
                }
        });
        for r in &claimed {
            if !r.is_write {
                self.mark_used(frame, name, r.line);
            }
        }
        if late && kind != BindingKind::Param {
            self.report(Message::UsedBeforeDefined(name.to_string()), line, character);
        }
    }

    fn mark_used(&mut self, frame: FrameId, name: &str, line: u32) {
        if let Some(binding) = self.frames[frame].bindings.get_mut(name) {
            binding.used = true;
            binding.use_lines.push(line);
        }
    }

    fn lookup(&self, name: &str) -> Option<FrameId> {
        let mut cursor = Some(self.current());
        while let Some(id) = cursor {
            if self.frames[id].bindings.contains_key(name) {
                return Some(id);
            }
            cursor = self.frames[id].parent;
        }
        None
    }

    fn resolves_implicitly(&self, name: &str) -> bool {
        name == "arguments" && !self.in_global_code()
    }

    /// A read of `name`
    pub fn reference(&mut self, name: &str, line: u32, character: u32, options: &OptionRegistry) {
        if let Some(frame) = self.lookup(name) {
            self.mark_used(frame, name, line);
            self.check_out_of_scope(frame, name, line, character, options);
            return;
        }
        if self.resolves_implicitly(name) || self.resolve_predefined(name) {
            return;
        }
        self.defer(name, line, character, false, options);
    }

    /// A read guarded by `typeof`: an unresolved name is not reported at all
    pub fn reference_guarded(&mut self, name: &str, line: u32) {
        if let Some(frame) = self.lookup(name) {
            self.mark_used(frame, name, line);
        } else {
            self.resolve_predefined(name);
        }
    }

    /// A write to `name`
    pub fn assign(&mut self, name: &str, line: u32, character: u32, options: &OptionRegistry) {
        if let Some(frame) = self.lookup(name) {
            let kind = self.frames[frame].bindings.get(name).map(|b| b.kind);
            match kind {
                Some(BindingKind::Const) => {
                    self.report(Message::ConstantOverride(name.to_string()), line, character)
                }
                Some(BindingKind::Exception) => {
                    self.report(Message::ExceptionAssign, line, character)
                }
                Some(BindingKind::Function) => {
                    self.report(Message::IsAFunction(name.to_string()), line, character)
                }
                _ => {}
            }
            self.check_out_of_scope(frame, name, line, character, options);
            return;
        }
        if self.resolves_implicitly(name) {
            return;
        }
        match self.predefined.lookup(name) {
            Some(writable) => {
                if let Some(global) = self.directive_globals.get_mut(name) {
                    global.used = true;
                }
                if !writable {
                    self.report(Message::ReadOnly, line, character);
                }
            }
            None => self.defer(name, line, character, true, options),
        }
    }

    fn check_out_of_scope(
        &mut self,
        frame: FrameId,
        name: &str,
        line: u32,
        character: u32,
        options: &OptionRegistry,
    ) {
        let hoisted = self.frames[frame]
            .bindings
            .get(name)
            .map_or(false, |b| b.hoisted_from_block);
        if hoisted && !options.enabled("funcscope") {
            self.report(Message::OutOfScope(name.to_string()), line, character);
        }
    }

    fn resolve_predefined(&mut self, name: &str) -> bool {
        if !self.predefined.contains(name) {
            return false;
        }
        if let Some(global) = self.directive_globals.get_mut(name) {
            global.used = true;
        }
        true
    }

    fn defer(&mut self, name: &str, line: u32, character: u32, is_write: bool, options: &OptionRegistry) {
        let reference = PendingRef {
            line,
            character,
            frame: self.current(),
            function: self.function_frame(),
            is_write,
            undef: options.enabled("undef"),
            latedef: options.latedef_policy(),
        };
        self.pending
            .entry(name.to_string())
            .or_default()
            .push(reference);
    }

    /// `/*global name*/`: predefine a name and track whether it is used
    pub fn declare_directive_global(&mut self, name: &str, writable: bool, line: u32, character: u32) {
        self.predefined.apply(GlobalChange::Declare {
            name: name.to_string(),
            writable,
        });
        self.directive_globals
            .entry(name.to_string())
            .or_insert(DirectiveGlobal {
                line,
                character,
                used: false,
            });
        // a directive placed after a use still covers it
        if let Some(refs) = self.pending.shift_remove(name) {
            if let Some(global) = self.directive_globals.get_mut(name) {
                global.used |= refs.iter().any(|r| !r.is_write);
            }
        }
    }

    /// `/*exported name*/`
    pub fn export(&mut self, name: &str) {
        self.exported.insert(name.to_string());
    }

    /// Record a label on the innermost frame
    pub fn add_label(&mut self, label: &str) {
        let current = self.current();
        self.frames[current].labels.push(label.to_string());
    }

    /// Whether `label` encloses the current position within this function
    pub fn has_label(&self, label: &str) -> bool {
        let function = self.function_frame();
        let mut cursor = Some(self.current());
        while let Some(id) = cursor {
            if self.frames[id].labels.iter().any(|l| l == label) {
                return true;
            }
            if id == function {
                return false;
            }
            cursor = self.frames[id].parent;
        }
        false
    }

    fn evaluate_unused(&mut self, frame: FrameId, policy: UnusedPolicy, lexical_only: bool) {
        let walk = match policy {
            UnusedPolicy::Off => UnusedPolicy::LastParam,
            other => other,
        };
        let is_global = self.frames[frame].kind == FrameKind::Global;

        let mut flagged: Vec<Binding> = Vec::new();
        let mut params: Vec<&Binding> = Vec::new();
        for binding in self.frames[frame].bindings.values() {
            match binding.kind {
                BindingKind::Exception | BindingKind::FunctionName | BindingKind::Global => {}
                BindingKind::Param => params.push(binding),
                kind if lexical_only && !kind.is_lexical() => {}
                _ => {
                    let exempt = is_global && self.exported.contains(&binding.name);
                    if !binding.used && !exempt {
                        flagged.push(binding.clone());
                    }
                }
            }
        }

        match walk {
            UnusedPolicy::Strict => {
                flagged.extend(params.iter().filter(|p| !p.used).map(|p| (*p).clone()));
            }
            UnusedPolicy::LastParam => {
                for param in params.iter().rev() {
                    if param.used {
                        break;
                    }
                    flagged.push((*param).clone());
                }
            }
            UnusedPolicy::Vars | UnusedPolicy::Off => {}
        }

        flagged.sort_by_key(|b| (b.line, b.character));
        for binding in flagged {
            if policy != UnusedPolicy::Off {
                self.report(Message::Unused(binding.name.clone()), binding.line, binding.character);
            }
            self.unused.push(UnusedBinding {
                name: binding.name,
                line: binding.line,
                character: binding.character,
                kind: binding.kind,
            });
        }
    }

    /// Close the run: check the global frame, then turn every still-pending
    /// reference into an undefined-name finding or an implied global.
    pub fn finish(&mut self, options: &OptionRegistry) -> ScopeOutcome {
        while self.stack.len() > 1 {
            self.exit_scope(options);
        }
        let policy = options.unused_policy();
        self.evaluate_unused(0, policy, false);

        let unused_globals: Vec<(String, u32, u32)> = self
            .directive_globals
            .iter()
            .filter(|(name, global)| !global.used && !self.exported.contains(*name))
            .map(|(name, global)| (name.clone(), global.line, global.character))
            .collect();
        for (name, line, character) in unused_globals {
            if policy != UnusedPolicy::Off {
                self.report(Message::Unused(name.clone()), line, character);
            }
            self.unused.push(UnusedBinding {
                name,
                line,
                character,
                kind: BindingKind::Global,
            });
        }

        let mut implieds = Vec::new();
        let pending = std::mem::take(&mut self.pending);
        for (name, refs) in pending {
            let mut lines = Vec::new();
            for r in refs {
                if r.undef {
                    self.report(Message::NotDefined(name.clone()), r.line, r.character);
                } else {
                    lines.push(r.line);
                }
            }
            if !lines.is_empty() {
                implieds.push(ImpliedGlobal { name, lines });
            }
        }

        ScopeOutcome {
            implieds,
            unused: std::mem::take(&mut self.unused),
            globals: self.frames[0].bindings.keys().cloned().collect(),
        }
    }
}

/// Whether `frame` is `ancestor` or lies below it
fn is_within(frames: &[Frame], frame: FrameId, ancestor: FrameId) -> bool {
    let mut cursor = Some(frame);
    while let Some(id) = cursor {
        if id == ancestor {
            return true;
        }
        cursor = frames.get(id).and_then(|f| f.parent);
    }
    false
}
