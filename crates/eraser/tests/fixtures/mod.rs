//! In-memory store used by the integration tests.
//!
//! Tables:
//! - `User`:    id
//! - `Profile`: id, user_id
//! - `Post`:    id, user_id
//! - `Comment`: id, user_id, post_id
//! - `Tag`:     id
//! - `Node`:    id, parent_id (plus an adjacency list for `links`)
//! - `post_tag` pivot rows (post_id, tag_id)
//!
//! Relations are resolved straight from the tables on every call, so a row
//! removed mid-cascade is immediately invisible to later lookups.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use eraser::prelude::*;

// ============================================================================
// Store
// ============================================================================

type Row = HashMap<&'static str, i64>;

#[derive(Default)]
pub struct Store {
    rows: RefCell<BTreeMap<&'static str, BTreeMap<i64, Row>>>,
    pivots: RefCell<Vec<(i64, i64)>>,
    edges: RefCell<Vec<(i64, i64)>>,
    defaults: RefCell<HashMap<&'static str, RecordOverrides>>,
    failing_deletes: RefCell<HashSet<(&'static str, i64)>>,
    failing_accessors: RefCell<HashSet<(&'static str, &'static str)>>,
    failing_results: RefCell<HashSet<(&'static str, &'static str)>>,
    deleted: RefCell<Vec<(&'static str, i64)>>,
}

impl Store {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// One user with one post and one comment on that post.
    ///
    /// Type defaults: `User` cascades `posts`, `Post` cascades `comments`.
    pub fn blog() -> Rc<Self> {
        let store = Self::new();
        store.set_defaults("User", RecordOverrides::new().relations_to_delete(["posts"]));
        store.set_defaults("Post", RecordOverrides::new().relations_to_delete(["comments"]));
        store.insert("User", 1, &[]);
        store.insert("Post", 10, &[("user_id", 1)]);
        store.insert("Comment", 100, &[("user_id", 1), ("post_id", 10)]);
        store
    }

    /// Nodes linked through `links`; every node cascades `links`.
    pub fn graph(nodes: &[i64], edges: &[(i64, i64)]) -> Rc<Self> {
        let store = Self::new();
        store.set_defaults(
            "Node",
            RecordOverrides::new()
                .relations_to_delete(["links"])
                .relation_methods(["links"]),
        );
        for &id in nodes {
            store.insert("Node", id, &[]);
        }
        for &edge in edges {
            store.link(edge.0, edge.1);
        }
        store
    }

    pub fn set_defaults(&self, ty: &'static str, overrides: RecordOverrides) {
        self.defaults.borrow_mut().insert(ty, overrides);
    }

    pub fn defaults_for(&self, ty: &'static str) -> RecordOverrides {
        self.defaults.borrow().get(ty).cloned().unwrap_or_default()
    }

    pub fn insert(&self, ty: &'static str, id: i64, fields: &[(&'static str, i64)]) {
        let row: Row = fields.iter().copied().collect();
        self.rows.borrow_mut().entry(ty).or_default().insert(id, row);
    }

    pub fn attach_tag(&self, post_id: i64, tag_id: i64) {
        self.pivots.borrow_mut().push((post_id, tag_id));
    }

    pub fn link(&self, from: i64, to: i64) {
        self.edges.borrow_mut().push((from, to));
    }

    pub fn fail_delete(&self, ty: &'static str, id: i64) {
        self.failing_deletes.borrow_mut().insert((ty, id));
    }

    pub fn fail_accessor(&self, ty: &'static str, accessor: &'static str) {
        self.failing_accessors.borrow_mut().insert((ty, accessor));
    }

    pub fn fail_results(&self, ty: &'static str, accessor: &'static str) {
        self.failing_results.borrow_mut().insert((ty, accessor));
    }

    pub fn count(&self, ty: &str) -> usize {
        self.rows.borrow().get(ty).map_or(0, BTreeMap::len)
    }

    pub fn exists(&self, ty: &str, id: i64) -> bool {
        self.rows
            .borrow()
            .get(ty)
            .is_some_and(|table| table.contains_key(&id))
    }

    pub fn pivot_count(&self) -> usize {
        self.pivots.borrow().len()
    }

    /// Every successful row removal, in order.
    pub fn deleted(&self) -> Vec<(&'static str, i64)> {
        self.deleted.borrow().clone()
    }

    fn field(&self, ty: &str, id: i64, column: &str) -> Option<i64> {
        self.rows
            .borrow()
            .get(ty)
            .and_then(|table| table.get(&id))
            .and_then(|row| row.get(column).copied())
    }

    fn ids_where(&self, ty: &str, column: &str, value: i64) -> Vec<i64> {
        self.rows.borrow().get(ty).map_or_else(Vec::new, |table| {
            table
                .iter()
                .filter(|(_, row)| row.get(column) == Some(&value))
                .map(|(id, _)| *id)
                .collect()
        })
    }

    fn remove(&self, ty: &'static str, id: i64) -> Result<(), StoreError> {
        if self.failing_deletes.borrow().contains(&(ty, id)) {
            return Err(StoreError::new("delete", format!("{}[{}] is locked", ty, id)));
        }
        let removed = self
            .rows
            .borrow_mut()
            .get_mut(ty)
            .and_then(|table| table.remove(&id));
        if removed.is_none() {
            return Err(StoreError::new("delete", format!("{}[{}] not found", ty, id)));
        }
        self.deleted.borrow_mut().push((ty, id));
        Ok(())
    }

    /// Store-side delete path: run the on-delete hook, then remove the row.
    pub fn delete_with_hook(
        &self,
        eraser: &Eraser,
        record: &Model,
    ) -> Result<Option<CascadeReport>, StoreError> {
        let report = eraser.deleting(record);
        record.delete()?;
        Ok(report)
    }
}

// ============================================================================
// Schema
// ============================================================================

const USER_ACCESSORS: &[AccessorInfo] = &[
    AccessorInfo::relation("posts", RelationKind::HasMany),
    AccessorInfo::relation("comments", RelationKind::HasMany),
    AccessorInfo::relation("profile", RelationKind::HasOne),
    AccessorInfo::new("name", ReturnType::Builtin("string")),
    AccessorInfo::new("getPosts", ReturnType::Relation(RelationKind::HasMany)),
];

const PROFILE_ACCESSORS: &[AccessorInfo] = &[AccessorInfo::relation(
    "user",
    RelationKind::BelongsTo,
)];

const POST_ACCESSORS: &[AccessorInfo] = &[
    AccessorInfo::relation("user", RelationKind::BelongsTo),
    AccessorInfo::relation("comments", RelationKind::HasMany),
    AccessorInfo::relation("tags", RelationKind::BelongsToMany),
    AccessorInfo::new("title", ReturnType::Builtin("string")),
];

const COMMENT_ACCESSORS: &[AccessorInfo] = &[
    AccessorInfo::relation("post", RelationKind::BelongsTo),
    AccessorInfo::relation("user", RelationKind::BelongsTo),
];

const TAG_ACCESSORS: &[AccessorInfo] = &[AccessorInfo::relation(
    "posts",
    RelationKind::BelongsToMany,
)];

const NODE_ACCESSORS: &[AccessorInfo] = &[
    AccessorInfo::untyped("links"),
    AccessorInfo::relation("parent", RelationKind::BelongsTo),
];

fn accessors_for(ty: &str) -> &'static [AccessorInfo] {
    match ty {
        "User" => USER_ACCESSORS,
        "Profile" => PROFILE_ACCESSORS,
        "Post" => POST_ACCESSORS,
        "Comment" => COMMENT_ACCESSORS,
        "Tag" => TAG_ACCESSORS,
        "Node" => NODE_ACCESSORS,
        _ => &[],
    }
}

#[derive(Debug, Clone, Copy)]
enum Link {
    /// Target rows whose `column` holds the source id.
    Children {
        target: &'static str,
        column: &'static str,
    },
    /// The target row whose id is in the source's `column`.
    Owner {
        target: &'static str,
        column: &'static str,
    },
    /// `post_tag` pivot, seen from the post side or the tag side.
    Pivot { target: &'static str, from_post: bool },
    /// Node adjacency list.
    Edges,
}

fn definition(ty: &str, accessor: &str) -> Option<(RelationKind, Link)> {
    use RelationKind::{BelongsTo, BelongsToMany, HasMany, HasOne};

    let def = match (ty, accessor) {
        ("User", "posts" | "getPosts") => (
            HasMany,
            Link::Children {
                target: "Post",
                column: "user_id",
            },
        ),
        ("User", "comments") => (
            HasMany,
            Link::Children {
                target: "Comment",
                column: "user_id",
            },
        ),
        ("User", "profile") => (
            HasOne,
            Link::Children {
                target: "Profile",
                column: "user_id",
            },
        ),
        ("Profile" | "Post" | "Comment", "user") => (
            BelongsTo,
            Link::Owner {
                target: "User",
                column: "user_id",
            },
        ),
        ("Post", "comments") => (
            HasMany,
            Link::Children {
                target: "Comment",
                column: "post_id",
            },
        ),
        ("Post", "tags") => (
            BelongsToMany,
            Link::Pivot {
                target: "Tag",
                from_post: true,
            },
        ),
        ("Comment", "post") => (
            BelongsTo,
            Link::Owner {
                target: "Post",
                column: "post_id",
            },
        ),
        ("Tag", "posts") => (
            BelongsToMany,
            Link::Pivot {
                target: "Post",
                from_post: false,
            },
        ),
        ("Node", "links") => (HasMany, Link::Edges),
        ("Node", "parent") => (
            BelongsTo,
            Link::Owner {
                target: "Node",
                column: "parent_id",
            },
        ),
        _ => return None,
    };
    Some(def)
}

// ============================================================================
// Records
// ============================================================================

pub struct Model {
    store: Rc<Store>,
    ty: &'static str,
    id: i64,
    overrides: RecordOverrides,
}

impl Model {
    /// Load a record with its type's default settings.
    pub fn load(store: &Rc<Store>, ty: &'static str, id: i64) -> Self {
        Self {
            store: Rc::clone(store),
            ty,
            id,
            overrides: store.defaults_for(ty),
        }
    }

    /// Adjust this instance's settings.
    pub fn configure(mut self, f: impl FnOnce(RecordOverrides) -> RecordOverrides) -> Self {
        self.overrides = f(self.overrides);
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Model {
    fn identity(&self) -> RecordIdentity {
        RecordIdentity::new(self.ty, self.id)
    }

    fn accessors(&self) -> &'static [AccessorInfo] {
        accessors_for(self.ty)
    }

    fn invoke(&self, accessor: &str) -> Result<AccessorValue, StoreError> {
        let failing = self
            .store
            .failing_accessors
            .borrow()
            .iter()
            .any(|(ty, name)| *ty == self.ty && *name == accessor);
        if failing {
            return Err(StoreError::new("invoke", format!("{} exploded", accessor)));
        }

        match (self.ty, accessor) {
            ("User", "name") => return Ok(AccessorValue::Value(Value::from("Ada"))),
            ("Post", "title") => return Ok(AccessorValue::Value(Value::from("Hello"))),
            _ => {}
        }

        let (kind, link) = definition(self.ty, accessor)
            .ok_or_else(|| StoreError::new("invoke", format!("undefined method {}", accessor)))?;
        let fails = self
            .store
            .failing_results
            .borrow()
            .iter()
            .any(|(ty, name)| *ty == self.ty && *name == accessor);

        Ok(AccessorValue::Relation(Box::new(ModelRelation {
            store: Rc::clone(&self.store),
            source: self.id,
            source_type: self.ty,
            kind,
            link,
            fails,
        })))
    }

    fn overrides(&self) -> RecordOverrides {
        self.overrides.clone()
    }

    fn delete(&self) -> Result<(), StoreError> {
        self.store.remove(self.ty, self.id)
    }
}

struct ModelRelation {
    store: Rc<Store>,
    source: i64,
    source_type: &'static str,
    kind: RelationKind,
    link: Link,
    fails: bool,
}

impl ModelRelation {
    fn target_type(&self) -> &'static str {
        match self.link {
            Link::Children { target, .. }
            | Link::Owner { target, .. }
            | Link::Pivot { target, .. } => target,
            Link::Edges => "Node",
        }
    }

    fn target_ids(&self) -> Vec<i64> {
        let store = &self.store;
        let target = self.target_type();
        let ids: Vec<i64> = match self.link {
            Link::Children { target, column } => store.ids_where(target, column, self.source),
            Link::Owner { column, .. } => store
                .field(self.source_type, self.source, column)
                .into_iter()
                .collect(),
            Link::Pivot { from_post, .. } => store
                .pivots
                .borrow()
                .iter()
                .filter_map(|&(post, tag)| {
                    if from_post && post == self.source {
                        Some(tag)
                    } else if !from_post && tag == self.source {
                        Some(post)
                    } else {
                        None
                    }
                })
                .collect(),
            Link::Edges => store
                .edges
                .borrow()
                .iter()
                .filter(|(from, _)| *from == self.source)
                .map(|(_, to)| *to)
                .collect(),
        };
        ids.into_iter()
            .filter(|id| store.exists(target, *id))
            .collect()
    }
}

impl Relation for ModelRelation {
    fn kind(&self) -> RelationKind {
        self.kind
    }

    fn results(&self) -> Result<Related, StoreError> {
        if self.fails {
            return Err(StoreError::new("select", "connection reset"));
        }
        let target = self.target_type();
        let mut records: Vec<Box<dyn Record>> = self
            .target_ids()
            .into_iter()
            .map(|id| Box::new(Model::load(&self.store, target, id)) as Box<dyn Record>)
            .collect();

        let to_one = matches!(
            self.kind,
            RelationKind::HasOne
                | RelationKind::MorphOne
                | RelationKind::BelongsTo
                | RelationKind::MorphTo
        );
        if !to_one {
            return Ok(Related::Many(records));
        }
        Ok(records.pop().map_or(Related::None, Related::One))
    }

    fn detach(&self, keys: &[Value]) -> Result<u64, StoreError> {
        let Link::Pivot { from_post, .. } = self.link else {
            return Err(StoreError::new("detach", "not a pivot relation"));
        };
        let keys: HashSet<i64> = keys
            .iter()
            .filter_map(|k| match k {
                Value::BigInt(n) => Some(*n),
                _ => None,
            })
            .collect();

        let mut pivots = self.store.pivots.borrow_mut();
        let before = pivots.len();
        pivots.retain(|&(post, tag)| {
            let (mine, other) = if from_post { (post, tag) } else { (tag, post) };
            !(mine == self.source && keys.contains(&other))
        });
        Ok((before - pivots.len()) as u64)
    }

    fn bulk_delete(&self) -> Result<u64, StoreError> {
        let target = self.target_type();
        let mut removed = 0;
        for id in self.target_ids() {
            self.store.remove(target, id)?;
            removed += 1;
        }
        Ok(removed)
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Logger that keeps every message it receives.
#[derive(Default)]
pub struct RecordingLogger {
    messages: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<(LogLevel, String)> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.messages()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    pub fn is_empty(&self) -> bool {
        self.messages().is_empty()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, message: &str) -> Result<(), LogError> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((level, message.to_string()));
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// An eraser with its own relation cache so tests never share discovery state.
pub fn eraser(mode: EraserMode) -> Eraser {
    Eraser::with_mode(mode).with_cache(Arc::new(RelationCache::new()))
}

/// Attach a recording logger to a record.
pub fn with_recorder(model: Model) -> (Model, Arc<RecordingLogger>) {
    let logger = RecordingLogger::new();
    let shared: Arc<dyn Logger> = logger.clone();
    (model.configure(|o| o.logger(shared)), logger)
}
