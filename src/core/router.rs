use crate::core::auth::{IdentityProvider, Session, SessionCache, SessionResolver, SessionSource};
use crate::core::types::{Role, View};
use crate::errors::{Error, Result};
use crate::logging::{LogTarget, Logger};
use std::rc::Rc;

/// Role × view state machine. Starts with no role on the login view.
pub struct Router {
    role: Option<Role>,
    view: View,
    session: Option<Session>,
    provider: Rc<dyn IdentityProvider>,
    cache: SessionCache,
    logger: Logger,
}

impl Router {
    pub fn new(provider: Rc<dyn IdentityProvider>, cache: SessionCache, logger: Logger) -> Self {
        Self {
            role: None,
            view: View::Login,
            session: None,
            provider,
            cache,
            logger,
        }
    }

    /// Restore a previous session and land on the dashboard when one exists.
    /// An unreadable cache is logged and treated as signed out.
    pub fn start(&mut self) -> Option<SessionSource> {
        let resolved = SessionResolver::new(self.provider.as_ref(), &self.cache).resolve();
        match resolved {
            Ok(Some((session, source))) => {
                self.logger.info(
                    format!("Restored session for {} ({})", session.username, session.role),
                    LogTarget::FileOnly,
                );
                self.enter(session);
                Some(source)
            }
            Ok(None) => None,
            Err(err) => {
                self.logger
                    .warn(format!("Ignoring session cache: {err}"), LogTarget::ConsoleAndFile);
                None
            }
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn can_edit(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.role.can_edit())
    }

    pub fn choose_role(&mut self, role: Role) -> Result<()> {
        if self.session.is_some() {
            return Err(Error::navigation("login", "already signed in; log out first"));
        }
        self.role = Some(role);
        self.view = View::Login;
        Ok(())
    }

    /// Sign in through the identity provider for the chosen role.
    pub fn login(&mut self, id: &str, secret: &str) -> Result<Session> {
        let Some(role) = self.role else {
            return Err(Error::auth("Choose a role first."));
        };
        if self.session.is_some() {
            return Err(Error::auth("Already signed in."));
        }
        let session = self.provider.sign_in(id, secret)?;
        if session.role != role {
            self.sign_out_quietly();
            return Err(Error::auth("Invalid username or password"));
        }
        if let Err(err) = self.cache.save(&session) {
            self.logger
                .warn(format!("Could not write session cache: {err}"), LogTarget::ConsoleAndFile);
        }
        self.logger.info(
            format!("Signed in as {} ({})", session.username, session.role),
            LogTarget::FileOnly,
        );
        self.enter(session.clone());
        Ok(session)
    }

    pub fn navigate(&mut self, view: View) -> Result<()> {
        self.check_navigate(view)?;
        self.view = view;
        Ok(())
    }

    /// Whether `navigate(view)` would succeed, without moving.
    pub fn check_navigate(&self, view: View) -> Result<()> {
        if view == View::Login {
            return Err(Error::navigation(view.to_string(), "use logout to return to sign-in"));
        }
        if self.session.is_none() {
            return Err(Error::navigation(view.to_string(), "sign in first"));
        }
        Ok(())
    }

    /// Always ends signed out on the login view. Provider and cache failures
    /// are logged, never returned.
    pub fn logout(&mut self) {
        self.sign_out_quietly();
        if let Err(err) = self.cache.clear() {
            self.logger
                .warn(format!("Could not clear session cache: {err}"), LogTarget::ConsoleAndFile);
        }
        if let Some(session) = self.session.take() {
            self.logger
                .info(format!("Signed out {}", session.username), LogTarget::FileOnly);
        }
        self.role = None;
        self.view = View::Login;
    }

    fn enter(&mut self, session: Session) {
        self.role = Some(session.role);
        self.session = Some(session);
        self.view = View::Dashboard;
    }

    fn sign_out_quietly(&self) {
        if let Err(err) = self.provider.sign_out() {
            self.logger
                .warn(format!("Sign-out failed: {err}"), LogTarget::ConsoleAndFile);
        }
    }
}
