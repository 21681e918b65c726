//! Unit test support: a tiny entity and an in-process recording mapper.

use crate::entity::Entity;
use crate::error::{UowError, UowResult};
use crate::mapper::{DataMapper, MapperOp};
use crate::types::{EntityId, EntityKey, EntityKind};
use parking_lot::Mutex;
use std::sync::Arc;

pub(crate) const POST: EntityKind = EntityKind::new("post");
pub(crate) const COMMENT: EntityKind = EntityKind::new("comment");

#[derive(Debug, Clone)]
pub(crate) struct Item {
    kind: EntityKind,
    id: EntityId,
    pub(crate) body: String,
}

impl Item {
    pub(crate) fn post(id: i64) -> Self {
        Self {
            kind: POST,
            id: EntityId::new(id),
            body: String::new(),
        }
    }

    pub(crate) fn comment(id: i64) -> Self {
        Self {
            kind: COMMENT,
            id: EntityId::new(id),
            body: String::new(),
        }
    }

    pub(crate) fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }
}

impl Entity for Item {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

pub(crate) type Calls = Arc<Mutex<Vec<(MapperOp, EntityKey, String)>>>;

/// Records every call into a shared log; fails inserts of `fail_insert`.
#[derive(Default)]
pub(crate) struct LogMapper {
    pub(crate) calls: Calls,
    pub(crate) fail_insert: Option<EntityKey>,
}

impl LogMapper {
    fn record(&self, op: MapperOp, item: &Item) {
        self.calls.lock().push((op, item.key(), item.body.clone()));
    }
}

impl DataMapper<Item> for LogMapper {
    fn insert(&self, entity: &Item) -> UowResult<()> {
        if self.fail_insert == Some(entity.key()) {
            return Err(UowError::entity_not_found(entity.kind(), entity.id()));
        }
        self.record(MapperOp::Insert, entity);
        Ok(())
    }

    fn update(&self, entity: &Item) -> UowResult<()> {
        self.record(MapperOp::Update, entity);
        Ok(())
    }

    fn delete(&self, entity: &Item) -> UowResult<()> {
        self.record(MapperOp::Delete, entity);
        Ok(())
    }
}
