//! The game session: ties the grid components to a [`Renderer`].
//!
//! A [`World`] owns all mutable game state (overlay, player, viewport) and
//! the caches currently in view. Every input is a synchronous `&mut self`
//! call; the renderer is told what changed as part of that call.

use std::collections::HashMap;

use crate::cache::{self, hand_message, CacheEntity, Outcome};
use crate::config::GameConfig;
use crate::generator::Generator;
use crate::geom::{Cell, Position};
use crate::overlay::Overlay;
use crate::persist::{PersistError, SavedState, Store};
use crate::player::{Controls, Direction, PlayerState};
use crate::viewport::Viewport;
use crate::Token;

/// Drawing collaborator.
///
/// The world hands each materialized cache to [`draw_cache`] and keeps the
/// returned handle beside the cache; the handle is given back when the
/// cache's label changes.
///
/// [`draw_cache`]: Renderer::draw_cache
pub trait Renderer {
    /// Whatever the renderer needs to find a drawn cache again.
    type Handle;

    /// Remove every drawn cache.
    fn clear(&mut self);

    /// Draw one cache. `in_range` is whether the player can use it.
    fn draw_cache(&mut self, cache: &CacheEntity, in_range: bool) -> Self::Handle;

    /// Redraw the label of a cache drawn earlier.
    fn update_label(&mut self, handle: &Self::Handle, cache: &CacheEntity);
}

/// A cache in view and its renderer handle.
struct Shown<H> {
    cache: CacheEntity,
    handle: H,
}

/// One running game.
pub struct World<R: Renderer> {
    config: GameConfig,
    generator: Generator,
    overlay: Overlay,
    player: PlayerState,
    controls: Controls,
    viewport: Viewport,
    renderer: R,
    shown: HashMap<Cell, Shown<R::Handle>>,
    status: String,
    won: bool,
}

impl<R: Renderer> World<R> {
    /// A fresh world: empty overlay, empty hand, player at the configured
    /// start, view of `rows` × `cols` cells around the player.
    pub fn new(config: GameConfig, renderer: R, rows: i32, cols: i32) -> Self {
        let generator = Generator::from_config(&config);
        let mut player = PlayerState::new(config.start);
        player.center_marker();
        let viewport = Viewport::new(player.position, rows, cols);
        Self {
            config,
            generator,
            overlay: Overlay::new(),
            player,
            controls: Controls::Buttons,
            viewport,
            renderer,
            shown: HashMap::new(),
            status: hand_message(0),
            won: false,
        }
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Current status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether the held token has reached the goal.
    pub fn has_won(&self) -> bool {
        self.won
    }

    /// The materialized cache at `cell`, if it is in view.
    pub fn cache(&self, cell: Cell) -> Option<&CacheEntity> {
        self.shown.get(&cell).map(|s| &s.cache)
    }

    /// Current value of any cell, in view or not.
    pub fn value_at(&self, cell: Cell) -> Token {
        self.overlay.value_at(&self.generator, cell)
    }

    /// Number of caches currently materialized.
    pub fn shown_len(&self) -> usize {
        self.shown.len()
    }

    // -------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------

    /// Discard every cache in view and rebuild them from the viewport.
    pub fn redraw(&mut self) {
        self.renderer.clear();
        self.shown.clear();
        let cells = self.viewport.cells();
        for cell in cells {
            let entity = CacheEntity::materialize(cell, &self.overlay, &self.generator);
            let in_range =
                cache::within_range(self.player.position, cell, self.config.collect_distance);
            let handle = self.renderer.draw_cache(&entity, in_range);
            self.shown.insert(
                cell,
                Shown {
                    cache: entity,
                    handle,
                },
            );
        }
        log::debug!("redrew {} caches over {cells}", self.shown.len());
    }

    /// Resize the view and redraw.
    pub fn resize_view(&mut self, rows: i32, cols: i32) {
        self.viewport.resize(rows, cols);
        self.redraw();
    }

    // -------------------------------------------------------------------
    // Interaction
    // -------------------------------------------------------------------

    /// Click the cache at `cell`. Cells not in view are ignored like
    /// out-of-range ones.
    pub fn click(&mut self, cell: Cell) -> Outcome {
        let Some(shown) = self.shown.get_mut(&cell) else {
            return Outcome::OutOfRange;
        };
        let outcome =
            cache::interact(&mut shown.cache, &mut self.player, self.config.collect_distance);
        if !outcome.exchanged() {
            return outcome;
        }
        self.overlay.reconcile(&self.generator, cell, shown.cache.value);
        self.renderer.update_label(&shown.handle, &shown.cache);
        self.status = outcome.status_message(self.player.held);
        log::debug!("cache {cell}: {outcome}, holding {}", self.player.held);
        self.check_win();
        outcome
    }

    fn check_win(&mut self) {
        if self.player.held == self.config.goal_value && !self.won {
            self.won = true;
            log::info!("goal token {} reached", self.config.goal_value);
        }
    }

    // -------------------------------------------------------------------
    // Movement and view
    // -------------------------------------------------------------------

    /// Move one cell. Only the button scheme accepts direction commands.
    pub fn move_player(&mut self, dir: Direction) -> bool {
        if self.controls != Controls::Buttons {
            return false;
        }
        self.player.step(dir);
        self.viewport.center_on(self.player.position);
        self.redraw();
        true
    }

    /// Apply a position from the live feed. Only the geo scheme accepts it.
    pub fn feed_position(&mut self, pos: Position) -> bool {
        if self.controls != Controls::Geo {
            return false;
        }
        self.player.position = pos;
        if self.player.following {
            self.viewport.center_on(pos);
        }
        self.redraw();
        true
    }

    /// Switch control scheme. Buttons snap the marker to its cell center and
    /// stop following; geo starts following.
    pub fn set_controls(&mut self, controls: Controls) {
        self.controls = controls;
        match controls {
            Controls::Buttons => {
                self.player.following = false;
                self.player.center_marker();
            }
            Controls::Geo => {
                self.player.following = true;
                self.viewport.center_on(self.player.position);
            }
        }
        log::info!("control scheme: {controls:?}");
        self.redraw();
    }

    /// Move the view by whole cells; the view stops following the player.
    pub fn pan(&mut self, delta: Cell) {
        self.player.following = false;
        self.viewport.pan_by(delta);
        self.redraw();
    }

    /// Start or stop following the player. Starting re-centers the view.
    pub fn set_following(&mut self, follow: bool) {
        self.player.following = follow;
        if follow {
            self.viewport.center_on(self.player.position);
        }
        self.redraw();
    }

    /// Follow the player again.
    pub fn recenter(&mut self) {
        self.set_following(true);
    }

    /// Begin again: forget every change to the world and empty the hand.
    /// The player keeps their position.
    pub fn reset(&mut self) {
        self.overlay.clear();
        self.player.held = 0;
        self.won = false;
        self.status = hand_message(0);
        if self.controls == Controls::Buttons {
            self.player.center_marker();
        }
        self.player.following = true;
        self.viewport.center_on(self.player.position);
        log::info!("world reset");
        self.redraw();
    }

    // -------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------

    /// Snapshot of what a save would write.
    pub fn saved_state(&self) -> SavedState {
        SavedState::capture(&self.player, &self.overlay)
    }

    /// Write the player and the overlay to `store`.
    pub fn save(&self, store: &mut impl Store) -> Result<(), PersistError> {
        let record = self.saved_state().encode()?;
        store.save(&record)?;
        log::info!("saved game, {} changed caches", self.overlay.len());
        Ok(())
    }

    /// Restore from `store`. Returns `false` when there was no usable record
    /// and the world was left as it is.
    pub fn load(&mut self, store: &impl Store) -> Result<bool, PersistError> {
        let Some(text) = store.load()? else {
            return Ok(false);
        };
        let Some(state) = SavedState::decode(&text) else {
            return Ok(false);
        };
        self.apply_saved(state);
        Ok(true)
    }

    /// Apply the fields present in `state`; absent ones keep their current
    /// values.
    pub fn apply_saved(&mut self, state: SavedState) {
        if let Some(pos) = state.position {
            self.player.position = pos;
            if self.controls == Controls::Buttons {
                self.player.center_marker();
            }
        }
        if let Some(held) = state.held {
            self.player.held = held;
        }
        if let Some(following) = state.following {
            self.player.following = following;
        }
        if let Some(caches) = state.caches {
            self.overlay.clear();
            for (cell, value) in caches {
                self.overlay.reconcile(&self.generator, cell, value);
            }
        }
        self.status = hand_message(self.player.held);
        self.won = false;
        self.check_win();
        self.viewport.center_on(self.player.position);
        log::info!(
            "loaded game at {}, holding {}, {} changed caches",
            self.player.position,
            self.player.held,
            self.overlay.len()
        );
        self.redraw();
    }
}
