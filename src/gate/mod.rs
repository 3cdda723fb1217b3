//! Step gating: which screen is mounted and whether Back/Continue are live.

mod logic;
mod variant;

#[allow(unused_imports)]
pub use logic::{can_go_back, can_go_forward, navigation, progress, screen_for, Navigation};
#[allow(unused_imports)]
pub use variant::{
    ForwardRule, ScreenId, SelectionMode, StepDef, Variant, VariantError, VariantSpec,
};
