use crate::core::grid::Roster;
use crate::core::store::{DocSnapshot, Document, DocumentStore, Subscription};
use crate::errors::{Error, Result};
use crate::extensions::string::NameKey;
use chrono::Utc;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

pub const SWAPS_COLLECTION: &str = "swaps";

const DELETE_PROMPT: &str = "Are you sure you want to delete this swap request?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub id: String,
    pub employee1: String,
    pub employee2: String,
    pub date: String,
    pub remark: String,
    /// Seconds since the epoch; `None` when the stored document has no usable stamp.
    pub created_at: Option<i64>,
}

impl SwapRequest {
    /// Missing string fields read as empty. `createdAt` may be a plain number
    /// or an object carrying `seconds`.
    pub fn from_snapshot(doc: &DocSnapshot) -> Self {
        let text = |key: &str| {
            doc.data
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let created_at = match doc.data.get("createdAt") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::Object(obj)) => obj.get("seconds").and_then(Value::as_i64),
            _ => None,
        };
        Self {
            id: doc.id.clone(),
            employee1: text("employee1"),
            employee2: text("employee2"),
            date: text("date"),
            remark: text("remark"),
            created_at,
        }
    }
}

/// Newest first; requests without a stamp go last in store order.
pub fn sort_newest_first(items: &mut [SwapRequest]) {
    items.sort_by(|a, b| match (a.created_at, b.created_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// The swap form's four fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapDraft {
    pub employee1: String,
    pub employee2: String,
    pub date: String,
    pub remark: String,
}

impl SwapDraft {
    pub fn new(
        employee1: impl Into<String>,
        employee2: impl Into<String>,
        date: impl Into<String>,
        remark: impl Into<String>,
    ) -> Self {
        Self {
            employee1: employee1.into(),
            employee2: employee2.into(),
            date: date.into(),
            remark: remark.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [&self.employee1, &self.employee2, &self.date, &self.remark];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(Error::validation("Please fill in all fields."));
        }
        if self.employee1.name_key() == self.employee2.name_key() {
            return Err(Error::validation("Employees must be different."));
        }
        Ok(())
    }

    /// Swap both names for their roster spelling. Leaves the draft untouched
    /// when either name is not on the roster.
    pub fn resolve_names(&mut self, roster: &Roster) -> Result<()> {
        let lookup = |name: &str| {
            roster.find(name).map(str::to_string).ok_or_else(|| {
                Error::validation(format!("'{}' is not on the roster.", name.trim()))
            })
        };
        let employee1 = lookup(self.employee1.as_str())?;
        let employee2 = lookup(self.employee2.as_str())?;
        self.employee1 = employee1;
        self.employee2 = employee2;
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn to_document(&self, created_at: i64) -> Document {
        let mut doc = Document::new();
        doc.insert("employee1".into(), Value::from(self.employee1.trim()));
        doc.insert("employee2".into(), Value::from(self.employee2.trim()));
        doc.insert("date".into(), Value::from(self.date.trim()));
        doc.insert("remark".into(), Value::from(self.remark.trim()));
        doc.insert("createdAt".into(), Value::from(created_at));
        doc
    }
}

/// Yes/no gate consulted before a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    Cancelled,
}

/// Latest list pushed by a subscription, plus the last delivery error.
pub struct LiveSwaps {
    items: Rc<RefCell<Vec<SwapRequest>>>,
    error: Rc<RefCell<Option<String>>>,
    _subscription: Subscription,
}

impl LiveSwaps {
    pub fn items(&self) -> Vec<SwapRequest> {
        self.items.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn last_error(&self) -> Option<String> {
        self.error.borrow().clone()
    }
}

pub struct SwapFeed {
    store: Rc<dyn DocumentStore>,
    clock: fn() -> i64,
    roster: Option<Roster>,
}

impl SwapFeed {
    pub fn new(store: Rc<dyn DocumentStore>) -> Self {
        Self {
            store,
            clock: || Utc::now().timestamp(),
            roster: None,
        }
    }

    /// Only employees on `roster` may be named in new requests.
    pub fn with_roster(mut self, roster: Roster) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Deliver the sorted list now and after every change to the collection.
    pub fn subscribe<F, E>(&self, mut on_list: F, on_error: E) -> Subscription
    where
        F: FnMut(Vec<SwapRequest>) + 'static,
        E: FnMut(&Error) + 'static,
    {
        self.store.subscribe(
            SWAPS_COLLECTION,
            Box::new(move |docs: &[DocSnapshot]| {
                let mut items: Vec<SwapRequest> =
                    docs.iter().map(SwapRequest::from_snapshot).collect();
                sort_newest_first(&mut items);
                on_list(items);
            }),
            Box::new(on_error),
        )
    }

    /// Subscribe into a holder that keeps the latest list.
    pub fn open(&self) -> LiveSwaps {
        let items = Rc::new(RefCell::new(Vec::new()));
        let error = Rc::new(RefCell::new(None));
        let (items_sink, error_sink) = (items.clone(), error.clone());
        let clear_error = error.clone();
        let subscription = self.subscribe(
            move |list| {
                *items_sink.borrow_mut() = list;
                *clear_error.borrow_mut() = None;
            },
            move |err| *error_sink.borrow_mut() = Some(err.to_string()),
        );
        LiveSwaps {
            items,
            error,
            _subscription: subscription,
        }
    }

    /// Validate, then add. The draft is cleared only when the store accepts it.
    pub fn submit(&self, draft: &mut SwapDraft) -> Result<String> {
        draft.validate()?;
        if let Some(roster) = &self.roster {
            draft.resolve_names(roster)?;
        }
        let doc = draft.to_document((self.clock)());
        let id = self
            .store
            .add(SWAPS_COLLECTION, doc)
            .map_err(|e| Error::store(format!("Failed to add swap: {}", store_message(&e))))?;
        draft.clear();
        Ok(id)
    }

    pub fn remove(&self, id: &str, confirmer: &mut dyn Confirm) -> Result<Removal> {
        if id.trim().is_empty() {
            return Err(Error::validation("Swap request id is required."));
        }
        if !confirmer.confirm(DELETE_PROMPT) {
            return Ok(Removal::Cancelled);
        }
        self.store
            .delete(SWAPS_COLLECTION, id.trim())
            .map_err(|e| Error::store(format!("Failed to delete swap: {}", store_message(&e))))?;
        Ok(Removal::Removed)
    }

    pub fn find(&self, id: &str) -> Result<Option<SwapRequest>> {
        let docs = self
            .store
            .list(SWAPS_COLLECTION)
            .map_err(|e| Error::store(format!("Failed to load swaps: {}", store_message(&e))))?;
        Ok(docs
            .iter()
            .find(|d| d.id == id.trim())
            .map(SwapRequest::from_snapshot))
    }

    pub fn delete_prompt() -> &'static str {
        DELETE_PROMPT
    }
}

fn store_message(err: &Error) -> String {
    match err {
        Error::Store(msg) => msg.clone(),
        other => other.to_string(),
    }
}
