// Library exports for the fontpane font fine-tuning panel
//
// # Crate layout
//
//   - `fontpane-config`: face slots/settings and the YAML chooser config
//   - `fontpane-spec`: font specification codec, axis model, variable selectors
//   - `fontpane-preview`: render backend interface and the preview cache
//   - this crate: control routing, the panel controller and image handles
//
// # Mutex Usage Policy
//
// All locking is sync-only and uses `parking_lot::Mutex`. The preview cache
// pairs its mutex with a `parking_lot::Condvar` so the synchronous click path
// can wait for an in-flight render instead of starting a second one. Never
// call the render backend while holding the cache lock.

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug;
pub mod error;
pub mod graphics;
pub mod panel;
pub mod router;
pub mod styles;

pub use error::{Error, GraphicsError, RouterError};
pub use graphics::{GraphicsManager, GraphicsSink, ImageSlot};
pub use panel::{
    AxisView, Choice, ChoiceRow, FacePanel, FeatureView, ImagePlacement, PanelView, PreviewBody,
    ReadyView, ScreenSize,
};
pub use router::{ControlId, apply};
pub use styles::StyleGroup;

// Sub-crate re-exports so hosts only need this crate
pub use fontpane_config::{ChooserConfig, FaceSettings, FaceSlot, TextStyle};
pub use fontpane_preview::{
    PreviewError, PreviewResult, PreviewSet, RenderBackend, RenderRequest, decode_response,
};
pub use fontpane_spec::{FontFeature, FontSpec, SpecError, parse};
