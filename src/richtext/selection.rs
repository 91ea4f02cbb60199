// Selection Coordinator
// Maps native host selections onto model ranges and tracks the active surface

use log::{debug, warn};

use super::error::EditResult;
use super::host::NativeSelection;
use super::range::Range;
use super::surface::{SurfaceId, Surfaces};

#[derive(Debug, Default)]
pub struct SelectionCoordinator {
    active: Option<SurfaceId>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface currently holding the selection
    pub fn active(&self) -> Option<SurfaceId> {
        self.active
    }

    /// Make a surface active without touching its selection
    pub fn focus(&mut self, surface: SurfaceId) {
        self.active = Some(surface);
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Hand the selection to `owner`, clearing whatever the previously
    /// active surface still tracks
    pub fn activate(&mut self, surfaces: &mut Surfaces, owner: SurfaceId) -> EditResult {
        if let Some(previous) = self.active
            && previous != owner
        {
            surfaces.get_mut(previous)?.set_selection(None);
        }
        self.active = Some(owner);
        Ok(())
    }

    /// Resolve a native selection into a Range on its owning surface.
    ///
    /// The anchor decides the owner. A focus inside another surface is
    /// collapsed onto the anchor. Passing None clears the selection of the
    /// active surface and blurs.
    pub fn sync(
        &mut self,
        surfaces: &mut Surfaces,
        native: Option<NativeSelection>,
    ) -> EditResult<Option<Range>> {
        let Some(mut native) = native else {
            if let Some(active) = self.active.take() {
                surfaces.get_mut(active)?.set_selection(None);
            }
            return Ok(None);
        };

        let owner = native.anchor.container.surface;
        if native.focus.container.surface != owner {
            warn!(
                "selection spans {} and {}, collapsing to anchor",
                owner, native.focus.container.surface
            );
            native.focus = native.anchor;
        }

        let range = surfaces.get(owner)?.range_from_native(&native)?;

        self.activate(surfaces, owner)?;
        surfaces.get_mut(owner)?.set_selection(Some(range));
        debug!("selection {}", range);
        Ok(Some(range))
    }
}
