//! Drawing session
//!
//! Owns the live command sequence and keeps the surface, the undo history
//! and the store in step with it. Every change that replaces the live
//! sequence is committed to history and redrawn from a reset surface.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::canvas::DrawingSurface;
use crate::command::Command;
use crate::config::DrawbotConfig;
use crate::engine::{render, Animator, CancelToken, History, PlaybackReport, RenderReport};
use crate::errors::{DrawError, Result};
use crate::generator::{self, CommandGenerator, GenerationContext, LocalGenerator};
use crate::prompt;
use crate::store::{DrawingStore, JsonFileStore};

pub struct DrawingSession<S: DrawingSurface> {
    surface: S,
    current: Vec<Command>,
    history: History,
    generator: Arc<dyn CommandGenerator>,
    fallback_to_local: bool,
    store: Option<Arc<dyn DrawingStore>>,
    animator: Animator,
    user_id: u64,
}

impl<S: DrawingSurface> DrawingSession<S> {
    /// Session using the local interpreter, no store and default pacing
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            current: Vec::new(),
            history: History::new(),
            generator: Arc::new(LocalGenerator::new()),
            fallback_to_local: false,
            store: None,
            animator: Animator::default(),
            user_id: 2,
        }
    }

    /// Session wired from configuration: generator, store file and pacing
    pub fn from_config(mut surface: S, config: &DrawbotConfig) -> Result<Self> {
        config.validate()?;
        if surface.size() != (config.canvas_width, config.canvas_height) {
            surface.resize(config.canvas_width, config.canvas_height);
        }
        let store: Arc<dyn DrawingStore> = Arc::new(JsonFileStore::new(config.store_path()));
        Ok(Self::new(surface)
            .with_generator(generator::from_config(config)?)
            .with_fallback(config.fallback_to_local)
            .with_store(store)
            .with_animator(Animator::new(config.animation_delay()))
            .with_user_id(config.remote.user_id))
    }

    pub fn with_generator(mut self, generator: Arc<dyn CommandGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Use the local interpreter when the generator fails
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_local = enabled;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn DrawingStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_animator(mut self, animator: Animator) -> Self {
        self.animator = animator;
        self
    }

    pub fn with_user_id(mut self, user_id: u64) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn commands(&self) -> &[Command] {
        &self.current
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Reset the surface and draw the live sequence
    pub fn redraw(&mut self) -> RenderReport {
        self.surface.reset();
        render(&mut self.surface, &self.current)
    }

    /// Make `commands` the live sequence, commit it and redraw
    pub fn set_commands(&mut self, commands: Vec<Command>) -> RenderReport {
        self.current = commands;
        self.history.commit(&self.current);
        self.redraw()
    }

    /// Produce commands for `prompt` and make them current.
    ///
    /// A generator failure is returned unchanged unless local fallback is
    /// enabled, in which case the keyword interpreter answers instead.
    pub async fn generate(&mut self, prompt: &str) -> Result<RenderReport> {
        let context = GenerationContext::for_prompt(self.user_id, prompt);
        let commands = match self.generator.generate(prompt, &context).await {
            Ok(commands) => commands,
            Err(e) if self.fallback_to_local => {
                warn!(
                    "Generator '{}' failed, using local interpreter: {}",
                    self.generator.name(),
                    e
                );
                prompt::interpret(prompt)
            }
            Err(e) => return Err(e),
        };

        info!(
            generator = self.generator.name(),
            commands = commands.len(),
            "Generated drawing"
        );
        Ok(self.set_commands(commands))
    }

    /// Step back in history and redraw; `false` when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            debug!("Nothing to undo");
            return false;
        };
        self.current = snapshot.to_vec();
        self.redraw();
        true
    }

    /// Step forward in history and redraw; `false` at the newest entry
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            debug!("Nothing to redo");
            return false;
        };
        self.current = snapshot.to_vec();
        self.redraw();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Blank the surface and commit an empty drawing
    pub fn clear(&mut self) {
        self.surface.reset();
        self.current.clear();
        self.history.commit(&[]);
    }

    /// Start over: forget history and blank the surface
    pub fn new_drawing(&mut self) {
        self.history.reset();
        self.current.clear();
        self.surface.reset();
    }

    /// Replay the live sequence with the configured pacing
    pub async fn animate(&mut self) -> PlaybackReport {
        self.animate_with_cancel(CancelToken::new()).await
    }

    /// Replay the live sequence; cancelling `token` stops it early.
    ///
    /// The session stays borrowed until playback ends, so cancel through a
    /// clone of `token` held by another task.
    pub async fn animate_with_cancel(&mut self, token: CancelToken) -> PlaybackReport {
        let report = self
            .animator
            .play_with_cancel(&mut self.surface, &self.current, &token)
            .await;
        info!(
            drawn = report.drawn,
            cancelled = report.cancelled,
            "Playback finished"
        );
        report
    }

    fn store(&self) -> Result<&Arc<dyn DrawingStore>> {
        self.store
            .as_ref()
            .ok_or_else(|| DrawError::config("No drawing store configured"))
    }

    /// Save the live sequence under `title`
    pub fn save(&self, title: &str) -> Result<u64> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DrawError::InvalidInput(Arc::new(
                "drawing title must not be blank".to_string(),
            )));
        }
        self.store()?.save(title, &self.current, self.user_id)
    }

    /// Load a stored drawing as the new live sequence
    pub fn load(&mut self, id: u64) -> Result<RenderReport> {
        let drawing = self.store()?.get(id)?;
        info!(id, title = %drawing.title, "Loaded drawing");
        Ok(self.set_commands(drawing.commands))
    }

    /// Encoded image of the surface
    pub fn export(&self) -> Result<String> {
        self.surface.export_image()
    }

    /// Resize the surface and redraw the live sequence on it
    pub fn resize(&mut self, width: u32, height: u32) -> RenderReport {
        self.surface.resize(width, height);
        self.redraw()
    }
}
