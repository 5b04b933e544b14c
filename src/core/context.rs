use crate::config::Config;
use crate::core::auth::{IdentityProvider, LocalIdentityProvider, SessionCache};
use crate::core::cli::CliPaths;
use crate::core::navigation::PeriodKind;
use crate::core::router::Router;
use crate::core::screen::ScheduleScreen;
use crate::core::store::{
    BlobStore, DocumentStore, JsonDocumentStore, JsonScheduleStore, LocalBlobStore, ScheduleStore,
};
use crate::core::swap::{LiveSwaps, SwapFeed};
use crate::core::types::View;
use crate::core::upload::AttachmentUploader;
use crate::errors::Result;
use crate::logging::{LogTarget, Logger};
use chrono::{Local, NaiveDate};
use std::rc::Rc;

/// State owned by the view currently on screen. Replacing it drops the
/// previous screen's edits and subscription.
#[derive(Default)]
pub enum ActiveView {
    #[default]
    Idle,
    Schedule(Box<ScheduleScreen>),
    Swaps(LiveSwaps),
}

pub struct AppContext {
    pub config: Config,
    pub logger: Logger,
    pub documents: Rc<dyn DocumentStore>,
    pub blobs: Rc<dyn BlobStore>,
    pub schedules: Rc<dyn ScheduleStore>,
    pub router: Router,
    pub active: ActiveView,
    pub paths: CliPaths,
    pub today: NaiveDate,
    pub startup_displayed: bool,
}

impl AppContext {
    pub fn new_with_paths(paths: CliPaths) -> Result<Self> {
        let config = Config::load_from(&paths.config_path)?;

        let logger = Logger::new();
        logger.set_log_dir(&paths.logs_dir);
        logger.set_file_logging_enabled(config.file_logging_enabled());
        Ok(Self::assemble(config, logger, paths))
    }

    /// Same wiring with a caller-supplied logger, used by tests.
    pub fn with_logger(paths: CliPaths, logger: Logger) -> Result<Self> {
        let config = Config::load_from(&paths.config_path)?;
        logger.set_log_dir(&paths.logs_dir);
        logger.set_file_logging_enabled(config.file_logging_enabled());
        Ok(Self::assemble(config, logger, paths))
    }

    fn assemble(config: Config, logger: Logger, paths: CliPaths) -> Self {
        let provider: Rc<dyn IdentityProvider> =
            Rc::new(LocalIdentityProvider::new(config.users().to_vec()));
        let router = Router::new(
            provider,
            SessionCache::in_dir(&paths.data_dir),
            logger.scoped("router"),
        );
        Self {
            documents: Rc::new(JsonDocumentStore::new(paths.documents_dir())),
            blobs: Rc::new(LocalBlobStore::new(paths.blobs_dir())),
            schedules: Rc::new(JsonScheduleStore::new(paths.schedules_dir())),
            router,
            active: ActiveView::Idle,
            today: Local::now().date_naive(),
            startup_displayed: false,
            config,
            logger,
            paths,
        }
    }

    /// Restore a cached session before the first prompt.
    pub fn start(&mut self) {
        if let Some(source) = self.router.start() {
            self.logger
                .info(format!("Session restored from {source:?}"), LogTarget::FileOnly);
        }
    }

    pub fn swap_feed(&self) -> Result<SwapFeed> {
        Ok(SwapFeed::new(self.documents.clone()).with_roster(self.config.roster()?))
    }

    pub fn uploader(&self) -> AttachmentUploader {
        AttachmentUploader::new(
            self.blobs.clone(),
            self.documents.clone(),
            self.config.upload_max_mb(),
        )
    }

    /// Build the state for `view`, then route to it. A failure leaves the
    /// router and the active view as they were.
    pub fn open_view(&mut self, view: View) -> Result<()> {
        self.router.check_navigate(view)?;
        let next = match view {
            View::Weekly => ActiveView::Schedule(Box::new(self.open_screen(PeriodKind::Week)?)),
            View::Monthly => ActiveView::Schedule(Box::new(self.open_screen(PeriodKind::Month)?)),
            View::Swap => ActiveView::Swaps(self.swap_feed()?.open()),
            View::Login | View::Dashboard => ActiveView::Idle,
        };
        self.router.navigate(view)?;
        self.active = next;
        Ok(())
    }

    pub fn logout(&mut self) {
        self.active = ActiveView::Idle;
        self.router.logout();
    }

    fn open_screen(&self, kind: PeriodKind) -> Result<ScheduleScreen> {
        ScheduleScreen::open(
            kind,
            self.today,
            self.config.roster()?,
            self.config.catalog()?,
            self.schedules.clone(),
            !self.router.can_edit(),
        )
    }

    pub fn screen(&self) -> Option<&ScheduleScreen> {
        match &self.active {
            ActiveView::Schedule(screen) => Some(screen),
            _ => None,
        }
    }

    pub fn screen_mut(&mut self) -> Option<&mut ScheduleScreen> {
        match &mut self.active {
            ActiveView::Schedule(screen) => Some(screen),
            _ => None,
        }
    }

    pub fn swaps(&self) -> Option<&LiveSwaps> {
        match &self.active {
            ActiveView::Swaps(live) => Some(live),
            _ => None,
        }
    }
}
