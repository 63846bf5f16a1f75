// Sprite sheet animation state machine

use crate::core::math::round_half_up;
use crate::engine::assets::{ClipRect, ImageHandle, SheetGrid};
use log::debug;

/// Index of a clip within its [`AnimationSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(pub(crate) usize);

impl ClipId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Parameters for a new clip
#[derive(Debug, Clone)]
pub struct ClipDefinition {
    pub name: String,
    /// Image sources bottom to top; the first is the base layer
    pub layers: Vec<String>,
    pub rows: u32,
    pub columns: u32,
    pub frame_count: u32,
    pub start_frame: f32,
    /// Negative loops forever, 0 never advances, N plays N cycles
    pub repeat: i32,
}

impl ClipDefinition {
    /// A `rows` x `columns` sheet playing every cell once per cycle, looping forever
    pub fn sheet<S: AsRef<str>>(name: &str, layers: &[S], rows: u32, columns: u32) -> Self {
        Self {
            name: name.to_string(),
            layers: layers.iter().map(|s| s.as_ref().to_string()).collect(),
            rows,
            columns,
            frame_count: rows * columns,
            start_frame: 0.0,
            repeat: -1,
        }
    }

    /// A single static frame, named `"default"`
    pub fn still<S: AsRef<str>>(layers: &[S]) -> Self {
        Self::sheet("default", layers, 1, 1).start_frame(1.0).repeat(0)
    }

    pub fn frames(mut self, frame_count: u32) -> Self {
        self.frame_count = frame_count;
        self
    }

    pub fn start_frame(mut self, frame: f32) -> Self {
        self.start_frame = frame;
        self
    }

    pub fn repeat(mut self, repeat: i32) -> Self {
        self.repeat = repeat;
        self
    }
}

/// A named animation: frame cursor, repeat budget, layers and collider
///
/// The grid (cell size and clip-point table) is unknown until the base
/// layer has been decoded; until then the clip renders and collides as
/// empty.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    name: String,
    /// Fractional frame cursor; the displayed cell is `round(frame)`
    pub frame: f32,
    pub frame_count: u32,
    pub repeat: i32,
    rows: u32,
    columns: u32,
    layers: Vec<ImageHandle>,
    grid: Option<SheetGrid>,
    collider: Option<ImageHandle>,
}

impl AnimationClip {
    pub fn new(definition: &ClipDefinition, layers: Vec<ImageHandle>) -> Self {
        Self {
            name: definition.name.clone(),
            frame: definition.start_frame,
            frame_count: definition.frame_count,
            repeat: definition.repeat,
            rows: definition.rows.max(1),
            columns: definition.columns.max(1),
            layers,
            grid: None,
            collider: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Layers bottom to top
    pub fn layers(&self) -> &[ImageHandle] {
        &self.layers
    }

    pub fn base_layer(&self) -> Option<ImageHandle> {
        self.layers.first().copied()
    }

    pub fn grid(&self) -> Option<&SheetGrid> {
        self.grid.as_ref()
    }

    /// Whether the base layer has been decoded and the grid derived
    pub fn is_ready(&self) -> bool {
        self.grid.is_some()
    }

    pub fn collider(&self) -> Option<ImageHandle> {
        self.collider
    }

    pub fn set_collider(&mut self, image: ImageHandle) {
        self.collider = Some(image);
    }

    /// Cell index shown for the current frame (`round` half up); `None` below zero
    pub fn cell_index(&self) -> Option<usize> {
        usize::try_from(round_half_up(self.frame)).ok()
    }

    /// Source rectangle of the current cell
    ///
    /// Before the grid exists this is an empty rectangle at the origin;
    /// cells past the table fall back to the origin with the cell size.
    pub fn clip_rect(&self) -> ClipRect {
        match &self.grid {
            Some(grid) => grid.cell_rect(self.cell_index()),
            None => ClipRect::default(),
        }
    }

    /// Step the frame cursor by `frames_per_tick`
    ///
    /// Returns whether the clip moved. Running past the last frame wraps to
    /// 0 and spends one repeat; running below 0 wraps to the last frame
    /// and spends nothing.
    pub fn advance(&mut self, frames_per_tick: f32) -> bool {
        if self.repeat == 0 {
            return false;
        }

        let last = self.frame_count as f32 - 1.0;
        self.frame += frames_per_tick;

        if self.frame > last {
            self.frame = 0.0;
            if self.repeat > 0 {
                self.repeat -= 1;
                if self.repeat == 0 {
                    debug!("Clip '{}' finished its repeats", self.name);
                }
            }
        } else if self.frame < 0.0 {
            self.frame = last.max(0.0);
        }
        true
    }

    /// Derive the grid once the base layer reports its size
    ///
    /// Returns `true` only the first time, and only for the base layer.
    /// The collider defaults to the base layer if none was set.
    pub fn on_layer_loaded(&mut self, image: ImageHandle, width: u32, height: u32) -> bool {
        if self.grid.is_some() || self.base_layer() != Some(image) {
            return false;
        }

        self.grid = Some(SheetGrid::from_image_size(
            width,
            height,
            self.rows,
            self.columns,
        ));
        if self.collider.is_none() {
            self.collider = Some(image);
        }
        debug!(
            "Clip '{}' grid ready: {}x{} cells of {:?}",
            self.name,
            self.rows,
            self.columns,
            self.grid.as_ref().map(|g| g.cell_size())
        );
        true
    }
}

/// Ordered clip set with an active clip and a shared playback speed
#[derive(Debug, Clone)]
pub struct AnimationSet {
    clips: Vec<AnimationClip>,
    active: usize,
    /// Frames advanced per tick; negative plays backwards, 0 pauses
    frames_per_tick: f32,
}

impl Default for AnimationSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationSet {
    pub fn new() -> Self {
        Self {
            clips: Vec::new(),
            active: 0,
            frames_per_tick: 1.0,
        }
    }

    /// Append a clip and make it active
    pub fn push(&mut self, clip: AnimationClip) -> ClipId {
        let id = ClipId(self.clips.len());
        self.clips.push(clip);
        self.active = id.0;
        id
    }

    /// Activate the first clip named `name`; unknown names change nothing
    pub fn goto(&mut self, name: &str) -> bool {
        match self.find(name) {
            Some(id) => {
                self.active = id.0;
                true
            }
            None => {
                debug!("No clip named '{}', staying on clip {}", name, self.active);
                false
            }
        }
    }

    /// First clip named `name`
    pub fn find(&self, name: &str) -> Option<ClipId> {
        self.clips
            .iter()
            .position(|clip| clip.name == name)
            .map(ClipId)
    }

    pub fn clip_by_name(&self, name: &str) -> Option<&AnimationClip> {
        self.find(name).and_then(|id| self.clip(id))
    }

    pub fn clip(&self, id: ClipId) -> Option<&AnimationClip> {
        self.clips.get(id.0)
    }

    pub fn clip_mut(&mut self, id: ClipId) -> Option<&mut AnimationClip> {
        self.clips.get_mut(id.0)
    }

    pub fn active_id(&self) -> Option<ClipId> {
        (self.active < self.clips.len()).then_some(ClipId(self.active))
    }

    pub fn active_clip(&self) -> Option<&AnimationClip> {
        self.clips.get(self.active)
    }

    pub fn active_clip_mut(&mut self) -> Option<&mut AnimationClip> {
        self.clips.get_mut(self.active)
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn frames_per_tick(&self) -> f32 {
        self.frames_per_tick
    }

    pub fn set_playback_speed(&mut self, frames_per_tick: f32) {
        self.frames_per_tick = frames_per_tick;
    }

    /// Resume at `frames_per_tick`
    pub fn play(&mut self, frames_per_tick: f32) {
        self.set_playback_speed(frames_per_tick);
    }

    /// Pause playback; the frame cursor stays put
    pub fn stop(&mut self) {
        self.frames_per_tick = 0.0;
    }

    /// Advance the active clip by one tick
    pub fn advance(&mut self) -> bool {
        let fpt = self.frames_per_tick;
        self.active_clip_mut()
            .map(|clip| clip.advance(fpt))
            .unwrap_or(false)
    }

    /// Move the active clip's cursor to `frame`
    pub fn rewind_to(&mut self, frame: f32) {
        if let Some(clip) = self.active_clip_mut() {
            clip.frame = frame;
        }
    }

    /// Back to the first frame
    pub fn rewind(&mut self) {
        self.rewind_to(0.0);
    }

    /// Source rectangle of the active clip's current cell
    pub fn active_clip_rect(&self) -> ClipRect {
        self.active_clip()
            .map(AnimationClip::clip_rect)
            .unwrap_or_default()
    }

    /// Override the collider of `clip`, or of the active clip
    pub fn set_collider(&mut self, image: ImageHandle, clip: Option<ClipId>) -> bool {
        let target = clip.map(|id| id.0).unwrap_or(self.active);
        match self.clips.get_mut(target) {
            Some(clip) => {
                clip.set_collider(image);
                true
            }
            None => false,
        }
    }

    /// Forward a decode completion to every clip; returns how many derived their grid
    pub fn on_image_loaded(&mut self, image: ImageHandle, width: u32, height: u32) -> usize {
        self.clips
            .iter_mut()
            .map(|clip| clip.on_layer_loaded(image, width, height))
            .filter(|&derived| derived)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(raw: u32) -> ImageHandle {
        ImageHandle::from_raw(raw)
    }

    fn clip(frame_count: u32, repeat: i32) -> AnimationClip {
        let def = ClipDefinition::sheet("walk", &["walk.png"], 1, frame_count).repeat(repeat);
        AnimationClip::new(&def, vec![handle(0)])
    }

    #[test]
    fn test_definition_builders() {
        let def = ClipDefinition::sheet("run", &["a.png", "b.png"], 2, 4);
        assert_eq!(def.frame_count, 8);
        assert_eq!(def.repeat, -1);
        assert_eq!(def.layers, vec!["a.png".to_string(), "b.png".to_string()]);

        let still = ClipDefinition::still(&["box.png"]);
        assert_eq!(still.name, "default");
        assert_eq!((still.rows, still.columns, still.frame_count), (1, 1, 1));
        assert_eq!(still.start_frame, 1.0);
        assert_eq!(still.repeat, 0);
    }

    #[test]
    fn test_static_clip_never_advances() {
        let mut clip = clip(4, 0);
        clip.frame = 2.0;
        for _ in 0..50 {
            assert!(!clip.advance(1.0));
        }
        assert_eq!(clip.frame, 2.0);
    }

    #[test]
    fn test_infinite_loop_never_halts() {
        let mut clip = clip(3, -1);
        let mut wraps = 0;
        for _ in 0..100 {
            assert!(clip.advance(1.0));
            if clip.frame == 0.0 {
                wraps += 1;
            }
        }
        assert_eq!(wraps, 33);
        assert!(clip.repeat < 0);
    }

    #[test]
    fn test_finite_repeat_halts() {
        let mut clip = clip(4, 2);

        // Two full cycles: 0 -> 1 -> 2 -> 3 -> wrap
        for _ in 0..8 {
            clip.advance(1.0);
        }
        assert_eq!(clip.repeat, 0);
        assert_eq!(clip.frame, 0.0);

        for _ in 0..10 {
            assert!(!clip.advance(1.0));
        }
        assert_eq!(clip.frame, 0.0);
    }

    #[test]
    fn test_backward_wrap_keeps_repeat() {
        let mut clip = clip(4, 1);
        clip.advance(-1.0);
        assert_eq!(clip.frame, 3.0);
        assert_eq!(clip.repeat, 1);

        clip.advance(-1.0);
        assert_eq!(clip.frame, 2.0);
    }

    #[test]
    fn test_fractional_speed_rounds_cell() {
        let mut clip = clip(4, -1);
        clip.on_layer_loaded(handle(0), 40, 10);

        clip.advance(0.25);
        assert_eq!(clip.cell_index(), Some(0));
        clip.advance(0.25);
        // 0.5 rounds up
        assert_eq!(clip.cell_index(), Some(1));
        assert_eq!(clip.clip_rect(), ClipRect::new(10, 0, 10, 10));
    }

    #[test]
    fn test_negative_frame_falls_back_to_origin() {
        let mut set = AnimationSet::new();
        let mut walk = clip(4, -1);
        walk.on_layer_loaded(handle(0), 40, 10);
        set.push(walk);

        set.rewind_to(-0.6);
        let active = set.active_clip().unwrap();
        assert_eq!(active.cell_index(), None);
        assert_eq!(active.clip_rect(), ClipRect::new(0, 0, 10, 10));

        // -0.4 still rounds to the first cell
        set.rewind_to(-0.4);
        assert_eq!(set.active_clip().unwrap().cell_index(), Some(0));
        assert_eq!(set.active_clip_rect(), ClipRect::new(0, 0, 10, 10));

        set.rewind_to(2.6);
        assert_eq!(set.active_clip_rect(), ClipRect::new(30, 0, 10, 10));
    }

    #[test]
    fn test_clip_rect_before_load() {
        let clip = clip(4, -1);
        assert!(!clip.is_ready());
        assert_eq!(clip.clip_rect(), ClipRect::default());
        assert_eq!(clip.collider(), None);
    }

    #[test]
    fn test_grid_derived_once_from_base_layer() {
        let def = ClipDefinition::sheet("hero", &["body.png", "hat.png"], 2, 2);
        let mut clip = AnimationClip::new(&def, vec![handle(0), handle(1)]);

        // A non-base layer never derives the grid
        assert!(!clip.on_layer_loaded(handle(1), 64, 64));
        assert!(!clip.is_ready());

        assert!(clip.on_layer_loaded(handle(0), 32, 16));
        assert_eq!(clip.grid().unwrap().clip_points().len(), 4);
        assert_eq!(clip.collider(), Some(handle(0)));

        // Duplicate completion is ignored
        assert!(!clip.on_layer_loaded(handle(0), 100, 100));
        assert_eq!(clip.grid().unwrap().cell_size(), glam::UVec2::new(16, 8));
    }

    #[test]
    fn test_explicit_collider_survives_load() {
        let mut clip = clip(2, -1);
        clip.set_collider(handle(9));
        clip.on_layer_loaded(handle(0), 20, 10);
        assert_eq!(clip.collider(), Some(handle(9)));
    }

    #[test]
    fn test_set_goto_and_active() {
        let mut set = AnimationSet::new();
        let walk = set.push(clip(4, -1));
        let jump_def = ClipDefinition::sheet("jump", &["jump.png"], 1, 2);
        let jump = set.push(AnimationClip::new(&jump_def, vec![handle(1)]));

        assert_eq!(set.active_id(), Some(jump));
        assert!(set.goto("walk"));
        assert_eq!(set.active_id(), Some(walk));

        assert!(!set.goto("swim"));
        assert_eq!(set.active_id(), Some(walk));
        assert_eq!(set.find("jump"), Some(jump));
        assert_eq!(set.clip_by_name("jump").map(|c| c.frame_count), Some(2));
        assert!(set.clip_by_name("swim").is_none());
    }

    #[test]
    fn test_empty_set() {
        let mut set = AnimationSet::new();
        assert!(set.is_empty());
        assert_eq!(set.active_id(), None);
        assert!(!set.advance());
        assert_eq!(set.active_clip_rect(), ClipRect::default());
        assert!(!set.set_collider(handle(0), None));
    }

    #[test]
    fn test_play_stop_rewind() {
        let mut set = AnimationSet::new();
        set.push(clip(4, -1));

        set.stop();
        set.advance();
        assert_eq!(set.active_clip().unwrap().frame, 0.0);

        set.play(2.0);
        set.advance();
        assert_eq!(set.active_clip().unwrap().frame, 2.0);

        set.rewind_to(1.0);
        assert_eq!(set.active_clip().unwrap().frame, 1.0);

        set.rewind();
        assert_eq!(set.active_clip().unwrap().frame, 0.0);
    }

    #[test]
    fn test_collider_override_targets_clip() {
        let mut set = AnimationSet::new();
        let first = set.push(clip(2, -1));
        set.push(clip(2, -1));

        assert!(set.set_collider(handle(5), Some(first)));
        assert_eq!(set.clip(first).unwrap().collider(), Some(handle(5)));
        assert_eq!(set.active_clip().unwrap().collider(), None);
    }

    #[test]
    fn test_load_event_reaches_all_clips_sharing_base() {
        let mut set = AnimationSet::new();
        set.push(clip(2, -1));
        set.push(clip(4, -1));

        assert_eq!(set.on_image_loaded(handle(0), 40, 10), 2);
        assert_eq!(set.on_image_loaded(handle(0), 40, 10), 0);
    }
}
