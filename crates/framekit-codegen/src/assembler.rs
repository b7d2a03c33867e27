//! The frame assembler.
//!
//! Orchestrates method generation:
//! 1. Validate the terminal disposition and add the implicit return
//! 2. Bind every dependency slot (insertion order)
//! 3. Order frames with a stable topological sort
//! 4. Nest frames under scope owners
//! 5. Name variables and emit source text

use std::collections::HashMap;

use framekit_types::{Literal, TypeName};
use sha2::{Digest, Sha256};

use crate::error::{CodegenError, CodegenResult};
use crate::frame::{ArgumentSource, Frame, FrameContext, Preference};
use crate::frame_map::FrameMap;
use crate::method_call::ReturnFrame;
use crate::naming::NamingContext;
use crate::rules::GenerationRules;
use crate::shape::MethodShape;
use crate::variable::Variable;
use crate::writer::SourceWriter;

// ══════════════════════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════════════════════

/// Assemble `shape` with the default [`GenerationRules`].
pub fn assemble(shape: &MethodShape) -> CodegenResult<AssembledMethod> {
    Assembler::default().assemble(shape)
}

/// The result of a successful assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledMethod {
    pub name: String,
    /// Complete method source, ending with a newline.
    pub source: String,
    /// External inputs, in signature order.
    pub parameters: Vec<Variable>,
    /// Values produced by frames, in emission order.
    pub locals: Vec<Variable>,
    /// Frame descriptions in emission order.
    pub order: Vec<String>,
    pub frame_map: FrameMap,
    /// Lower-case hex SHA-256 of `source`.
    pub fingerprint: String,
}

impl AssembledMethod {
    /// Description of the frame that emitted a 1-based source line.
    pub fn frame_at_line(&self, line: u32) -> Option<&str> {
        self.frame_map
            .frame_at_line(line)
            .map(|e| e.description.as_str())
    }
}

/// Orders, scopes, names, and emits the frames of a [`MethodShape`].
///
/// Holds only configuration; all per-method state lives in a single
/// `assemble` call.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    rules: GenerationRules,
}

impl Assembler {
    pub fn new(rules: GenerationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &GenerationRules {
        &self.rules
    }

    #[tracing::instrument(level = "debug", skip_all, fields(method = %shape.name()))]
    pub fn assemble(&self, shape: &MethodShape) -> CodegenResult<AssembledMethod> {
        let implicit_return = implicit_return(shape)?;
        let mut frames: Vec<&dyn Frame> = shape.frames().iter().map(|f| f.as_ref()).collect();
        if let Some(ret) = &implicit_return {
            frames.push(ret);
        }

        let bindings = bind(&frames, shape.inputs())?;
        let order = order(&frames, &bindings)?;
        tracing::debug!(
            order = ?order.iter().map(|&i| frames[i].describe()).collect::<Vec<_>>(),
            "frames ordered"
        );
        let tree = nest(&frames, &order);

        let mut emitter = Emitter::new(&frames, &bindings, &self.rules);
        let source = emitter.emit_method(shape, &tree);
        let fingerprint = format!("{:x}", Sha256::digest(source.as_bytes()));
        tracing::debug!(%fingerprint, lines = source.lines().count(), "method assembled");

        Ok(AssembledMethod {
            name: shape.name().to_string(),
            source,
            parameters: emitter.parameters,
            locals: emitter.locals,
            order: emitter.order,
            frame_map: emitter.frame_map,
            fingerprint,
        })
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Shape validation
// ══════════════════════════════════════════════════════════════════════════════

fn implicit_return(shape: &MethodShape) -> CodegenResult<Option<ReturnFrame>> {
    let terminals = shape.frames().iter().filter(|f| f.is_terminal()).count();
    let invalid = |reason: String| CodegenError::InvalidMethodShape {
        method: shape.name().to_string(),
        reason,
    };
    match (shape.result(), terminals) {
        (_, n) if n > 1 => Err(invalid(format!("{n} terminal frames"))),
        (None, 1) => Err(invalid("a void method cannot return a value".to_string())),
        (Some(ty), 0) => Ok(Some(ReturnFrame::new(ty.clone()))),
        _ => Ok(None),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Binding
// ══════════════════════════════════════════════════════════════════════════════

/// What one dependency slot resolved to.
#[derive(Debug, Clone, PartialEq)]
enum Bound {
    Literal(Literal),
    Input(usize),
    Produced { frame: usize, index: usize },
}

/// Resolve every slot of every frame, in insertion order.
fn bind(frames: &[&dyn Frame], inputs: &[TypeName]) -> CodegenResult<Vec<Vec<Bound>>> {
    let created: Vec<Vec<TypeName>> = frames.iter().map(|f| f.creates()).collect();
    let mut claimed = vec![false; inputs.len()];

    let unclaimed_input = |ty: &TypeName, claimed: &mut Vec<bool>| {
        let position = inputs
            .iter()
            .zip(claimed.iter())
            .position(|(input, taken)| input == ty && !taken)?;
        claimed[position] = true;
        Some(position)
    };

    let mut all = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        let mut slots = Vec::new();
        for dep in frame.uses() {
            let missing = || CodegenError::MissingInput {
                frame: frame.describe(),
                ty: dep.ty.clone(),
            };
            let bound = match &dep.source {
                ArgumentSource::Literal(literal) => Bound::Literal(literal.clone()),
                ArgumentSource::Input(position) => {
                    if inputs.get(*position) != Some(&dep.ty) {
                        return Err(missing());
                    }
                    claimed[*position] = true;
                    Bound::Input(*position)
                }
                ArgumentSource::Produced(ty) => producer(&created, i, ty).ok_or_else(|| {
                    CodegenError::MissingInput {
                        frame: frame.describe(),
                        ty: ty.clone(),
                    }
                })?,
                ArgumentSource::Default => match dep.preference {
                    Preference::InputFirst => unclaimed_input(&dep.ty, &mut claimed)
                        .map(Bound::Input)
                        .or_else(|| producer(&created, i, &dep.ty))
                        .ok_or_else(missing)?,
                    Preference::ProducedFirst => producer(&created, i, &dep.ty)
                        .or_else(|| unclaimed_input(&dep.ty, &mut claimed).map(Bound::Input))
                        .or_else(|| inputs.iter().position(|t| t == &dep.ty).map(Bound::Input))
                        .ok_or_else(missing)?,
                },
            };
            tracing::trace!(frame = %frame.describe(), ty = %dep.ty, ?bound, "slot bound");
            slots.push(bound);
        }
        all.push(slots);
    }
    Ok(all)
}

/// The producer of `ty` for frame `consumer`: the nearest frame inserted
/// before it, else the first one inserted after it.
fn producer(created: &[Vec<TypeName>], consumer: usize, ty: &TypeName) -> Option<Bound> {
    let produces = |frame: usize| {
        created[frame]
            .iter()
            .position(|t| t == ty)
            .map(|index| Bound::Produced { frame, index })
    };
    (0..consumer)
        .rev()
        .find_map(produces)
        .or_else(|| (consumer + 1..created.len()).find_map(produces))
}

// ══════════════════════════════════════════════════════════════════════════════
// Ordering
// ══════════════════════════════════════════════════════════════════════════════

/// Stable topological order: among ready frames the lowest insertion index
/// wins, and terminal frames wait until no other frame is ready.
fn order(frames: &[&dyn Frame], bindings: &[Vec<Bound>]) -> CodegenResult<Vec<usize>> {
    let producers: Vec<Vec<usize>> = bindings
        .iter()
        .map(|slots| {
            let mut from: Vec<usize> = slots
                .iter()
                .filter_map(|b| match b {
                    Bound::Produced { frame, .. } => Some(*frame),
                    _ => None,
                })
                .collect();
            from.sort_unstable();
            from.dedup();
            from
        })
        .collect();

    let mut placed = vec![false; frames.len()];
    let mut order = Vec::with_capacity(frames.len());
    while order.len() < frames.len() {
        let ready: Vec<usize> = (0..frames.len())
            .filter(|&i| !placed[i] && producers[i].iter().all(|&p| placed[p]))
            .collect();
        let next = ready
            .iter()
            .copied()
            .find(|&i| !frames[i].is_terminal())
            .or_else(|| ready.first().copied());
        match next {
            Some(i) => {
                placed[i] = true;
                order.push(i);
            }
            None => {
                let unresolved = (0..frames.len())
                    .filter(|&i| !placed[i])
                    .map(|i| frames[i].describe())
                    .collect();
                return Err(CodegenError::CircularDependency { frames: unresolved });
            }
        }
    }
    Ok(order)
}

// ══════════════════════════════════════════════════════════════════════════════
// Scoping
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
struct Node {
    frame: usize,
    children: Vec<Node>,
}

/// A scope owner takes every frame ordered after it as children.
fn nest(frames: &[&dyn Frame], order: &[usize]) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (k, &frame) in order.iter().enumerate() {
        if frames[frame].owns_scope() {
            nodes.push(Node {
                frame,
                children: nest(frames, &order[k + 1..]),
            });
            break;
        }
        nodes.push(Node {
            frame,
            children: Vec::new(),
        });
    }
    nodes
}

// ══════════════════════════════════════════════════════════════════════════════
// Emission
// ══════════════════════════════════════════════════════════════════════════════

struct Emitter<'a> {
    frames: &'a [&'a dyn Frame],
    bindings: &'a [Vec<Bound>],
    rules: &'a GenerationRules,
    naming: NamingContext,
    parameters: Vec<Variable>,
    locals: Vec<Variable>,
    /// `(frame, creates index)` → position in `locals`.
    produced: HashMap<(usize, usize), usize>,
    order: Vec<String>,
    frame_map: FrameMap,
}

impl<'a> Emitter<'a> {
    fn new(
        frames: &'a [&'a dyn Frame],
        bindings: &'a [Vec<Bound>],
        rules: &'a GenerationRules,
    ) -> Self {
        Self {
            frames,
            bindings,
            rules,
            naming: NamingContext::new(rules.name_suffix_start),
            parameters: Vec::new(),
            locals: Vec::new(),
            produced: HashMap::new(),
            order: Vec::new(),
            frame_map: FrameMap::new(),
        }
    }

    fn emit_method(&mut self, shape: &MethodShape, tree: &[Node]) -> String {
        for ty in shape.inputs() {
            let name = self.naming.declare(ty);
            self.parameters.push(Variable::new(ty.clone(), name));
        }
        let params = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        let result = shape.result().map(TypeName::as_str).unwrap_or("void");

        let mut w = SourceWriter::new(self.rules.indent_width);
        w.line(format!(
            "{} {} {}({})",
            self.rules.access_modifier,
            result,
            shape.name(),
            params
        ));
        w.open_block();
        self.emit_nodes(tree, &mut w);
        w.close_block();
        w.finish()
    }

    fn emit_nodes(&mut self, nodes: &[Node], w: &mut SourceWriter) {
        for node in nodes {
            self.emit_node(node, w);
        }
    }

    fn emit_node(&mut self, node: &Node, w: &mut SourceWriter) {
        let frame = self.frames[node.frame];
        let scoped = frame.owns_scope();
        if scoped {
            self.naming.push_scope();
        }

        let mut created = Vec::new();
        for (index, ty) in frame.creates().into_iter().enumerate() {
            let name = self.naming.declare(&ty);
            self.produced.insert((node.frame, index), self.locals.len());
            self.locals.push(Variable::new(ty, name.clone()));
            created.push(name);
        }
        let bindings = self.bindings;
        let arguments = bindings[node.frame]
            .iter()
            .map(|bound| self.render(bound))
            .collect();
        let cx = FrameContext::new(created, arguments);

        let description = frame.describe();
        self.order.push(description.clone());
        let start_line = w.lines_written() + 1;
        if scoped {
            frame.generate_scoped(&cx, w, &mut |w: &mut SourceWriter| {
                self.emit_nodes(&node.children, w)
            });
            self.naming.pop_scope();
            tracing::debug!(frame = %description, "scope closed");
        } else {
            frame.generate(&cx, w);
        }
        self.frame_map
            .push(node.frame, description, start_line, w.lines_written());
    }

    /// Source expression for a bound slot; counts the variable usage.
    fn render(&mut self, bound: &Bound) -> String {
        let variable = match bound {
            Bound::Literal(literal) => return literal.to_string(),
            Bound::Input(position) => self.parameters.get_mut(*position),
            Bound::Produced { frame, index } => match self.produced.get(&(*frame, *index)) {
                Some(&local) => self.locals.get_mut(local),
                None => None,
            },
        };
        match variable {
            Some(v) => {
                v.usages += 1;
                v.name.clone()
            }
            None => String::new(),
        }
    }
}
