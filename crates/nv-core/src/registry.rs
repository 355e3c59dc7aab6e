//! Annotation registry
//!
//! Maps a hierarchical namespace (`"camera.markers.peaks"`) to an ordered group
//! of [`Drawable`]s plus a visibility flag. Groups are created lazily on first
//! use with `enabled = true` and are never removed; [`AnnotationRegistry::clear_all`]
//! empties object lists but keeps every namespace and its flag.
//!
//! Namespaces are kept in a `BTreeMap`, so iteration (drawing, the visibility
//! file, the visibility panel) is lexicographic.
//!
//! ## Visibility file
//!
//! One line per namespace: `"<0|1> <namespace>"`. Loading is best-effort: a
//! missing file is an empty state and malformed lines are skipped.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use egui::{Color32, Pos2};

use crate::annotation::{self, Drawable, Line, MarkerKind, Text};
use crate::canvas::Canvas;
use crate::error::Result;

/// Annotations sharing one namespace
#[derive(Debug, Clone)]
pub struct AnnotationGroup {
    pub enabled: bool,
    objects: Vec<Drawable>,
}

impl Default for AnnotationGroup {
    fn default() -> Self {
        Self {
            enabled: true,
            objects: Vec::new(),
        }
    }
}

impl AnnotationGroup {
    /// Objects in draw order
    pub fn objects(&self) -> &[Drawable] {
        &self.objects
    }
}

/// One row of the visibility tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityEntry {
    pub namespace: String,
    /// Last dot-separated segment
    pub label: String,
    pub enabled: bool,
}

/// Namespaces grouped by tree node; `None` holds namespaces without a dot.
pub type VisibilityTree = BTreeMap<Option<String>, Vec<VisibilityEntry>>;

/// Split a namespace into its tree node and leaf label at the last `.`.
pub fn split_namespace(namespace: &str) -> (Option<&str>, &str) {
    match namespace.rfind('.') {
        Some(0) => (None, &namespace[1..]),
        Some(i) => (Some(&namespace[..i]), &namespace[i + 1..]),
        None => (None, namespace),
    }
}

/// Annotation groups by namespace, each with its own visibility flag.
#[derive(Debug, Default)]
pub struct AnnotationRegistry {
    spaces: BTreeMap<String, AnnotationGroup>,
}

impl AnnotationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group for `namespace`, created on first use
    pub fn group_mut(&mut self, namespace: &str) -> &mut AnnotationGroup {
        self.spaces.entry(namespace.to_owned()).or_insert_with(|| {
            tracing::debug!(namespace, "Creating annotation namespace");
            AnnotationGroup::default()
        })
    }

    pub fn group(&self, namespace: &str) -> Option<&AnnotationGroup> {
        self.spaces.get(namespace)
    }

    pub fn push(&mut self, namespace: &str, drawable: Drawable) {
        self.group_mut(namespace).objects.push(drawable);
    }

    pub fn put_text(
        &mut self,
        namespace: &str,
        text: impl Into<String>,
        anchor: Pos2,
        color: Color32,
        background: Option<Color32>,
    ) {
        self.push(
            namespace,
            Drawable::Text(Text {
                anchor,
                text: text.into(),
                color,
                background,
            }),
        );
    }

    pub fn line(&mut self, namespace: &str, start: Pos2, end: Pos2, color: Color32, thickness: f32) {
        self.push(
            namespace,
            Drawable::Line(Line {
                start,
                end,
                color,
                thickness,
            }),
        );
    }

    pub fn arrow(
        &mut self,
        namespace: &str,
        start: Pos2,
        end: Pos2,
        color: Color32,
        thickness: f32,
        head_length: f32,
    ) {
        for (from, to) in annotation::arrow_lines(start, end, head_length) {
            self.line(namespace, from, to, color, thickness);
        }
    }

    pub fn marker(
        &mut self,
        namespace: &str,
        pos: Pos2,
        color: Color32,
        kind: MarkerKind,
        size: f32,
        thickness: f32,
    ) {
        for (from, to) in annotation::marker_lines(pos, size, kind) {
            self.line(namespace, from, to, color, thickness);
        }
    }

    /// Empty every group, keeping namespaces and their visibility flags.
    pub fn clear_all(&mut self) {
        for group in self.spaces.values_mut() {
            group.objects.clear();
        }
    }

    /// Render every enabled group whose namespace starts with `prefix`.
    ///
    /// An empty prefix selects all groups.
    pub fn draw(&self, canvas: &mut dyn Canvas, origin: Pos2, zoom: f32, prefix: &str) {
        for group in self
            .spaces
            .iter()
            .filter(|(ns, group)| group.enabled && ns.starts_with(prefix))
            .map(|(_, group)| group)
        {
            for object in &group.objects {
                object.render(canvas, origin, zoom);
            }
        }
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.spaces.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    /// `None` for namespaces that were never used
    pub fn is_enabled(&self, namespace: &str) -> Option<bool> {
        self.spaces.get(namespace).map(|g| g.enabled)
    }

    pub fn set_enabled(&mut self, namespace: &str, enabled: bool) {
        self.group_mut(namespace).enabled = enabled;
    }

    pub fn set_all_enabled(&mut self, enabled: bool) {
        for group in self.spaces.values_mut() {
            group.enabled = enabled;
        }
    }

    /// Set every namespace directly under tree node `node` (`None` = top level).
    pub fn set_node_enabled(&mut self, node: Option<&str>, enabled: bool) {
        for (ns, group) in &mut self.spaces {
            if split_namespace(ns).0 == node {
                group.enabled = enabled;
            }
        }
    }

    pub fn visibility_tree(&self) -> VisibilityTree {
        let mut tree = VisibilityTree::new();
        for (ns, group) in &self.spaces {
            let (node, label) = split_namespace(ns);
            tree.entry(node.map(str::to_owned))
                .or_default()
                .push(VisibilityEntry {
                    namespace: ns.clone(),
                    label: label.to_owned(),
                    enabled: group.enabled,
                });
        }
        tree
    }

    /// Apply a visibility file, returning the number of lines applied.
    ///
    /// A missing file leaves the registry untouched.
    pub fn load_visibility(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No visibility state file, using defaults");
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        let mut applied = 0;
        for (line_no, line) in contents.lines().enumerate() {
            match parse_visibility_line(line) {
                Some((enabled, ns)) => {
                    self.set_enabled(ns, enabled);
                    applied += 1;
                }
                None => {
                    tracing::debug!(line = line_no + 1, content = line, "Skipping malformed visibility line")
                }
            }
        }
        tracing::info!(path = %path.display(), applied, "Loaded annotation visibility");
        Ok(applied)
    }

    pub fn save_visibility(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.visibility_state())?;
        tracing::info!(path = %path.display(), namespaces = self.spaces.len(), "Saved annotation visibility");
        Ok(())
    }

    /// Visibility file contents for the current registry
    pub fn visibility_state(&self) -> String {
        let mut out = String::new();
        for (ns, group) in &self.spaces {
            let _ = writeln!(out, "{} {}", u8::from(group.enabled), ns);
        }
        out
    }
}

fn parse_visibility_line(line: &str) -> Option<(bool, &str)> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (flag, ns) = line.split_once(' ')?;
    let enabled = match flag {
        "1" => true,
        "0" => false,
        _ => return None,
    };
    (!ns.is_empty()).then_some((enabled, ns))
}
