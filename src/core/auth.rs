use crate::core::types::Role;
use crate::errors::{Error, Result};
use crate::extensions::string::NameKey;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use pbkdf2::pbkdf2_hmac;
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

/// One entry of the credential table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password: PasswordRecord,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl UserRecord {
    pub fn new(username: &str, secret: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            password: PasswordRecord::create(secret),
            role,
            display_name: None,
        }
    }

    pub fn shown_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 200_000;

fn default_pbkdf2_iterations() -> u32 {
    DEFAULT_PBKDF2_ITERATIONS
}

/// PBKDF2-HMAC-SHA256 digest of a secret. Salt and hash are base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRecord {
    pub salt: String,
    pub hash: String,
    #[serde(default = "default_pbkdf2_iterations")]
    pub iterations: u32,
}

impl PasswordRecord {
    /// Fresh random 16-byte salt.
    pub fn create(secret: &str) -> Self {
        let mut salt = [0u8; 16];
        OsRng.fill_bytes(&mut salt);
        Self::with_salt(secret, &salt, DEFAULT_PBKDF2_ITERATIONS)
    }

    pub fn with_salt(secret: &str, salt: &[u8], iterations: u32) -> Self {
        let iterations = iterations.max(1);
        Self {
            salt: B64.encode(salt),
            hash: B64.encode(derive_key(secret, salt, iterations)),
            iterations,
        }
    }

    /// False for a wrong secret and for a record whose salt is not base64.
    pub fn verify(&self, secret: &str) -> bool {
        if self.salt.is_empty() || self.hash.is_empty() {
            return false;
        }
        let Ok(salt) = B64.decode(self.salt.as_bytes()) else {
            return false;
        };
        B64.encode(derive_key(secret, &salt, self.iterations.max(1))) == self.hash
    }
}

fn derive_key(secret: &str, salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(secret.as_bytes(), salt, iterations, &mut key);
    key
}

pub type AuthListener = Box<dyn FnMut(Option<&Session>)>;

pub trait IdentityProvider {
    fn current_user(&self) -> Option<Session>;
    fn sign_in(&self, id: &str, secret: &str) -> Result<Session>;
    fn sign_out(&self) -> Result<()>;

    /// Role of a known account, `None` when the account does not exist.
    fn account_role(&self, id: &str) -> Option<Role>;

    /// Called with the new state after every sign-in and sign-out until the
    /// handle is dropped.
    fn watch(&self, listener: AuthListener) -> AuthWatch;
}

type Watchers = RefCell<Vec<(u64, Rc<RefCell<AuthListener>>)>>;

#[derive(Default)]
struct WatchList {
    next_id: std::cell::Cell<u64>,
    watchers: Watchers,
}

impl WatchList {
    fn notify(&self, session: Option<&Session>) {
        let listeners: Vec<_> = self.watchers.borrow().iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            if let Ok(mut listener) = listener.try_borrow_mut() {
                (*listener)(session);
            }
        }
    }
}

#[must_use = "dropping an AuthWatch stops the notifications"]
pub struct AuthWatch {
    list: Weak<WatchList>,
    id: u64,
}

impl Drop for AuthWatch {
    fn drop(&mut self) {
        if let Some(list) = self.list.upgrade() {
            list.watchers.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

/// In-process provider over the configured credential table. Usernames
/// compare case- and whitespace-insensitively.
pub struct LocalIdentityProvider {
    users: Vec<UserRecord>,
    current: RefCell<Option<Session>>,
    watchers: Rc<WatchList>,
}

impl LocalIdentityProvider {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self {
            users,
            current: RefCell::new(None),
            watchers: Rc::new(WatchList::default()),
        }
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn find(&self, id: &str) -> Option<&UserRecord> {
        let key = id.name_key();
        self.users.iter().find(|u| u.username.name_key() == key)
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn current_user(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    fn sign_in(&self, id: &str, secret: &str) -> Result<Session> {
        let (id, secret) = (id.trim(), secret.trim());
        if id.is_empty() || secret.is_empty() {
            return Err(Error::validation("Enter username and password"));
        }
        let user = self
            .find(id)
            .filter(|u| u.password.verify(secret))
            .ok_or_else(|| Error::auth("Invalid username or password"))?;
        let session = Session {
            username: user.username.clone(),
            role: user.role,
        };
        *self.current.borrow_mut() = Some(session.clone());
        self.watchers.notify(Some(&session));
        Ok(session)
    }

    fn sign_out(&self) -> Result<()> {
        self.current.borrow_mut().take();
        self.watchers.notify(None);
        Ok(())
    }

    fn account_role(&self, id: &str) -> Option<Role> {
        self.find(id).map(|u| u.role)
    }

    fn watch(&self, listener: AuthListener) -> AuthWatch {
        let id = self.watchers.next_id.get() + 1;
        self.watchers.next_id.set(id);
        self.watchers
            .watchers
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(listener))));
        AuthWatch {
            list: Rc::downgrade(&self.watchers),
            id,
        }
    }
}

/// The "signed in" flag kept between runs.
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    pub const FILE_NAME: &'static str = "session.json";

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&text)
            .map_err(|e| Error::auth(format!("Unreadable session cache: {e}")))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(session)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    Provider,
    Cache,
}

/// Startup policy: a live provider session wins, the cache is the fallback.
/// A cached session whose account is gone or has another role is cleared.
pub struct SessionResolver<'a> {
    provider: &'a dyn IdentityProvider,
    cache: &'a SessionCache,
}

impl<'a> SessionResolver<'a> {
    pub fn new(provider: &'a dyn IdentityProvider, cache: &'a SessionCache) -> Self {
        Self { provider, cache }
    }

    pub fn resolve(&self) -> Result<Option<(Session, SessionSource)>> {
        if let Some(session) = self.provider.current_user() {
            return Ok(Some((session, SessionSource::Provider)));
        }
        let Some(cached) = self.cache.load()? else {
            return Ok(None);
        };
        if self.provider.account_role(&cached.username) != Some(cached.role) {
            self.cache.clear()?;
            return Err(Error::auth(format!(
                "Cached session for '{}' no longer matches an account.",
                cached.username
            )));
        }
        Ok(Some((cached, SessionSource::Cache)))
    }
}
