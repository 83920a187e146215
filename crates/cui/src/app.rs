use anyhow::{Context, Result};
use cinder_core::{
    AdvanceOutcome, CatalogSource, Controller, ControllerConfig, Entity, Event, EventBus,
    ImageCarousel, LoadError, Phase, ResetOutcome,
};
use cinder_data::{load_controller_config, normalize_locale, FileSystemCatalog};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

const MAX_EVENT_LOG: usize = 200;

type CatalogResult = Result<Vec<Entity>, LoadError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiLocale {
    EnUs,
    ZhCn,
}

impl UiLocale {
    pub fn from_opt(value: Option<&str>) -> Self {
        let normalized = normalize_locale(value);
        if normalized == "zh_CN" {
            Self::ZhCn
        } else {
            Self::EnUs
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::ZhCn => "zh_CN",
        }
    }

    pub fn text<'a>(self, en: &'a str, zh: &'a str) -> &'a str {
        if matches!(self, Self::ZhCn) {
            zh
        } else {
            en
        }
    }
}

pub struct App {
    pub locale: UiLocale,
    pub controller: Controller,
    pub events: EventBus,
    pub carousel: ImageCarousel,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
    source: Arc<dyn CatalogSource + Sync>,
    pending_load: Option<Receiver<CatalogResult>>,
}

impl App {
    pub fn bootstrap(locale: UiLocale, catalog_root: &Path, seed: Option<u64>) -> Result<Self> {
        let mut config = load_controller_config(catalog_root).context("load config")?;
        if seed.is_some() {
            config.seed = seed;
        }
        let source = Arc::new(FileSystemCatalog::new(catalog_root));
        Self::with_source(locale, config, source)
    }

    pub fn with_source(
        locale: UiLocale,
        config: ControllerConfig,
        source: Arc<dyn CatalogSource + Sync>,
    ) -> Result<Self> {
        let controller = Controller::new(config).context("create controller")?;
        let mut app = Self {
            locale,
            controller,
            events: EventBus::default(),
            carousel: ImageCarousel::default(),
            event_log: VecDeque::new(),
            status_line: locale.text("loading", "加载中").to_string(),
            show_help: false,
            should_quit: false,
            source,
            pending_load: None,
        };
        app.push_event_line(format!("seed {}", app.controller.seed()));
        app.start_load();
        Ok(app)
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.poll_load();
        if self.controller.release_cooldown(now) {
            debug!("advance cooldown released");
        }
        self.carousel.sync(self.controller.top());
        self.flush_events();
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn like(&mut self, now: Instant) {
        match self.controller.advance(now, &mut self.events) {
            AdvanceOutcome::Advanced { refilled, .. } => {
                let status = if refilled {
                    self.locale.text("liked, new round", "已喜欢，新一轮开始")
                } else {
                    self.locale.text("liked", "已喜欢")
                };
                self.push_status(status);
            }
            AdvanceOutcome::Ignored => {}
            AdvanceOutcome::Empty => {
                self.push_status(self.locale.text("preparing cards", "准备中"));
            }
            AdvanceOutcome::NotReady => {}
        }
        self.carousel.sync(self.controller.top());
        self.flush_events();
    }

    pub fn reset(&mut self) {
        match self.controller.reset(&mut self.events) {
            ResetOutcome::Reset => self.push_status(self.locale.text("reset", "已重置")),
            ResetOutcome::ReloadRequested => {
                self.push_status(self.locale.text("retrying", "重试中"));
                self.start_load();
            }
            ResetOutcome::Ignored => {}
        }
        self.carousel.sync(self.controller.top());
        self.flush_events();
    }

    pub fn cycle_image(&mut self) {
        if let Some(top) = self.controller.top() {
            self.carousel.next_image(top);
        }
    }

    pub fn next_hint(&self) -> &'static str {
        match self.controller.phase() {
            Phase::Loading => self.locale.text("wait", "请稍候"),
            Phase::Error(_) => self.locale.text("r retry", "r 重试"),
            Phase::Ready if self.controller.stack().is_empty() => {
                self.locale.text("r reset", "r 重置")
            }
            Phase::Ready => self
                .locale
                .text("-> like, space photo, r reset", "-> 喜欢, 空格 换图, r 重置"),
        }
    }

    pub fn push_status(&mut self, status: impl Into<String>) {
        let status = status.into();
        self.status_line = status.clone();
        self.push_event_line(status);
    }

    fn start_load(&mut self) {
        let source = Arc::clone(&self.source);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(source.load_catalog());
        });
        self.pending_load = Some(rx);
        info!("catalog load started");
    }

    fn poll_load(&mut self) {
        let Some(rx) = self.pending_load.as_ref() else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(LoadError::Message(
                "catalog loader stopped without a result".to_string(),
            )),
        };
        self.pending_load = None;
        self.controller.finish_load(result, &mut self.events);
        let status = match self.controller.phase() {
            Phase::Ready => self.locale.text("ready", "就绪"),
            _ => self.locale.text("load failed", "加载出错了"),
        };
        self.push_status(status);
    }

    fn flush_events(&mut self) {
        let lines: Vec<String> = self
            .events
            .drain()
            .map(|event| describe_event(self.locale, &event))
            .collect();
        for line in lines {
            self.push_event_line(line);
        }
    }

    fn push_event_line(&mut self, line: String) {
        self.event_log.push_back(line);
        while self.event_log.len() > MAX_EVENT_LOG {
            self.event_log.pop_front();
        }
    }
}

fn describe_event(locale: UiLocale, event: &Event) -> String {
    match event {
        Event::CatalogLoaded { entities } => {
            format!("{} {entities}", locale.text("catalog loaded:", "已加载:"))
        }
        Event::CatalogFailed { message } => {
            format!("{} {message}", locale.text("load failed:", "加载失败:"))
        }
        Event::ReloadRequested => locale.text("reloading catalog", "重新加载").to_string(),
        Event::RoundStarted { round, cards } => format!(
            "{} {round} ({cards})",
            locale.text("round", "轮次")
        ),
        Event::CardDegraded { entity } => {
            format!("{} {entity}", locale.text("no photo for", "没有照片:"))
        }
        Event::CardLiked {
            entity,
            image,
            render_id,
            liked,
        } => format!(
            "{} {entity} {} {render_id} ({liked})",
            locale.text("liked", "喜欢"),
            image
                .map(|idx| format!("img{}", idx + 1))
                .unwrap_or_else(|| "-".to_string()),
        ),
        Event::UsedPruned { removed, remaining } => format!(
            "{} -{removed} ={remaining}",
            locale.text("history pruned", "记录清理")
        ),
        Event::AdvanceIgnored => locale
            .text("too fast, ignored", "太快了，已忽略")
            .to_string(),
        Event::Reset { cards } => format!("{} ({cards})", locale.text("reset", "重置")),
    }
}
