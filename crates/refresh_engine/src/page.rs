use std::collections::{BTreeMap, HashMap};

use ego_tree::{NodeId, NodeRef, Tree};
use refresh_core::{ControlId, ControlSpec};
use refresh_logging::{refresh_debug, refresh_warn};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

const REFRESH_TYPE_ATTR: &str = "data-refresh-type";
const REFRESH_TARGETS_ATTR: &str = "data-refresh-div";
/// Detached nodes tolerated before the tree is rebuilt.
const COMPACT_MIN_ORPHANS: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PageError {
    #[error("no element with id {0:?} on the page")]
    MissingRoot(String),
    #[error("invalid control selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
}

/// A control newly bound by [`Page::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundControl {
    pub control_id: ControlId,
    pub spec: ControlSpec,
}

/// The live page: a parsed document plus the registry of bound controls.
pub struct Page {
    document: Html,
    bound: HashMap<NodeId, ControlId>,
    controls: BTreeMap<ControlId, NodeId>,
    next_control_id: ControlId,
    /// Nodes detached from the document but still held by the tree arena.
    orphaned: usize,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
            bound: HashMap::new(),
            controls: BTreeMap::new(),
            next_control_id: 1,
            orphaned: 0,
        }
    }

    /// Bind every control matching `selector` under `root_id` (or the whole page).
    ///
    /// Elements are keyed by tree identity, so calling this again only binds
    /// controls that were not seen before, such as ones arriving in a splice.
    pub fn initialize(
        &mut self,
        root_id: Option<&str>,
        selector: &str,
    ) -> Result<Vec<BoundControl>, PageError> {
        let parsed = Selector::parse(selector).map_err(|err| PageError::InvalidSelector {
            selector: selector.to_string(),
            message: format!("{err:?}"),
        })?;

        let root = match root_id {
            Some(id) => self
                .find_element(id)
                .ok_or_else(|| PageError::MissingRoot(id.to_string()))?,
            None => self.document.root_element(),
        };

        let found: Vec<(NodeId, ControlSpec)> = root
            .select(&parsed)
            .filter(|element| !self.bound.contains_key(&element.id()))
            .filter_map(read_control)
            .collect();

        let mut newly_bound = Vec::with_capacity(found.len());
        for (node_id, spec) in found {
            let control_id = self.next_control_id;
            self.next_control_id += 1;
            self.bound.insert(node_id, control_id);
            self.controls.insert(control_id, node_id);
            refresh_debug!(
                "Bound control {} refresh_type={} targets={:?}",
                control_id,
                spec.refresh_type,
                spec.targets
            );
            newly_bound.push(BoundControl { control_id, spec });
        }
        Ok(newly_bound)
    }

    /// Replace the inner content of the element `target_id` with copies of
    /// `source`'s children. The element itself is kept.
    pub fn splice(&mut self, target_id: &str, source: ElementRef<'_>) -> bool {
        let Some(target) = self.find_element(target_id).map(|el| el.id()) else {
            return false;
        };
        self.replace_children(target, source.children());
        true
    }

    /// Rewrite a control's text. A lone text child is edited in place.
    pub fn set_label(&mut self, control_id: ControlId, label: &str) -> bool {
        let Some(node_id) = self.controls.get(&control_id).copied() else {
            return false;
        };
        let lone_text = self.document.tree.get(node_id).and_then(|node| {
            let mut children = node.children();
            match (children.next(), children.next()) {
                (Some(child), None) if child.value().is_text() => Some(child.id()),
                _ => None,
            }
        });
        if let Some(mut child) = lone_text.and_then(|id| self.document.tree.get_mut(id)) {
            if let Node::Text(text) = child.value() {
                text.text = label.into();
                return true;
            }
        }
        let text = Html::parse_fragment(&escape_text(label));
        self.replace_children(node_id, text.root_element().children());
        true
    }

    /// Nodes held by the tree, attached or not.
    pub fn node_count(&self) -> usize {
        self.document.tree.nodes().count()
    }

    pub fn control_label(&self, control_id: ControlId) -> Option<String> {
        let node_id = self.controls.get(&control_id)?;
        let node = self.document.tree.get(*node_id)?;
        ElementRef::wrap(node).map(|el| el.text().collect())
    }

    pub fn inner_html(&self, id: &str) -> Option<String> {
        self.find_element(id).map(|el| el.inner_html())
    }

    pub fn element_html(&self, id: &str) -> Option<String> {
        self.find_element(id).map(|el| el.html())
    }

    pub fn html(&self) -> String {
        self.document.html()
    }

    pub fn bound_count(&self) -> usize {
        self.controls.len()
    }

    fn compact_if_needed(&mut self) {
        let live = self.document.tree.root().descendants().count();
        if self.orphaned > COMPACT_MIN_ORPHANS.max(live) {
            self.compact();
        }
    }

    /// Rebuild the tree from its attached nodes, dropping orphans, and re-key
    /// the control registry. Controls no longer on the page are forgotten.
    fn compact(&mut self) {
        let old = &self.document.tree;
        let mut fresh = Tree::new(old.root().value().clone());
        let fresh_root = fresh.root().id();
        let mut remap = HashMap::new();
        remap.insert(old.root().id(), fresh_root);
        for child in old.root().children() {
            graft(&mut fresh, fresh_root, child, &mut |from, to| {
                remap.insert(from, to);
            });
        }

        self.controls.retain(|_, node_id| match remap.get(&*node_id) {
            Some(moved) => {
                *node_id = *moved;
                true
            }
            None => false,
        });
        self.bound = self
            .controls
            .iter()
            .map(|(control_id, node_id)| (*node_id, *control_id))
            .collect();
        refresh_debug!(
            "Compacted page tree, dropped {} detached nodes",
            self.orphaned
        );
        self.document.tree = fresh;
        self.orphaned = 0;
    }

    fn find_element(&self, id: &str) -> Option<ElementRef<'_>> {
        self.document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().id() == Some(id))
    }

    fn replace_children<'a>(
        &mut self,
        parent: NodeId,
        children: impl Iterator<Item = NodeRef<'a, Node>>,
    ) {
        let stale: Vec<NodeId> = match self.document.tree.get(parent) {
            Some(node) => node.children().map(|child| child.id()).collect(),
            None => return,
        };
        self.orphaned += stale
            .iter()
            .filter_map(|id| self.document.tree.get(*id))
            .map(|child| child.descendants().count())
            .sum::<usize>();
        for id in stale {
            if let Some(mut child) = self.document.tree.get_mut(id) {
                child.detach();
            }
        }
        for child in children {
            graft(&mut self.document.tree, parent, child, &mut |_, _| {});
        }
        self.compact_if_needed();
    }
}

fn read_control(element: ElementRef<'_>) -> Option<(NodeId, ControlSpec)> {
    let attrs = element.value();
    let Some(refresh_type) = attrs.attr(REFRESH_TYPE_ATTR) else {
        refresh_warn!(
            "Skipping <{}> control without a {} attribute",
            attrs.name(),
            REFRESH_TYPE_ATTR
        );
        return None;
    };
    let targets = attrs.attr(REFRESH_TARGETS_ATTR).unwrap_or_default();
    let label: String = element.text().collect();
    Some((element.id(), ControlSpec::new(refresh_type, targets, label)))
}

/// Deep-copy `source` under `parent`, reporting each (source, copy) id pair.
fn graft(
    tree: &mut Tree<Node>,
    parent: NodeId,
    source: NodeRef<'_, Node>,
    copied: &mut dyn FnMut(NodeId, NodeId),
) {
    let Some(mut parent) = tree.get_mut(parent) else {
        return;
    };
    let copy = parent.append(source.value().clone()).id();
    copied(source.id(), copy);
    for child in source.children() {
        graft(tree, copy, child, copied);
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
