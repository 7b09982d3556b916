//! The scene membership controller.
//!
//! A small state machine over {not-in-scene, in-scene}: the active instance
//! is in the render scene's draw set exactly when the component is enabled,
//! its entity is enabled in the hierarchy, and a model is present. All
//! transitions are idempotent — presence is decided by the scene's
//! membership test, never by a flag cached here.

use crate::model::BindContext;
use crate::model::component::ModelComponent;
use crate::model::instance::RenderFlags;

impl ModelComponent {
    /// Enables or disables the component, reconciling scene membership.
    pub fn set_enabled(&mut self, enabled: bool, ctx: &mut BindContext<'_>) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        self.refresh_membership(ctx);
    }

    /// Reconciles draw-set and shadow-set membership with the current
    /// enabled/model state. Also the hook the host calls after toggling the
    /// entity's enabled flag, which this controller cannot observe itself.
    pub fn refresh_membership(&mut self, ctx: &mut BindContext<'_>) {
        let Some(model) = &self.model else {
            return;
        };
        let id = model.id();
        let visible = self.enabled && ctx.graph.is_enabled_in_hierarchy(self.entity());

        if visible {
            if !ctx.scene.contains_model(id) {
                ctx.scene.add_model(id);
            }
            if self.flags.contains(RenderFlags::CAST_SHADOW) {
                ctx.scene.add_shadow_caster(id);
            }
        } else {
            ctx.scene.remove_model(id);
            ctx.scene.remove_shadow_caster(id);
        }
    }

    /// Assigns the batch group (−1 = ungrouped).
    ///
    /// Leaving a batch group while enabled forces re-addition to the scene:
    /// the external batching collaborator removed the instance from the
    /// draw set outside this controller's control when it claimed the
    /// group. The reverse transition is left to the batcher.
    pub fn set_batch_group(&mut self, group: i32, ctx: &mut BindContext<'_>) {
        if self.batch_group == group {
            return;
        }
        let was_grouped = self.batch_group >= 0;
        self.batch_group = group;

        if was_grouped && group < 0 && self.enabled && self.model.is_some() {
            self.refresh_membership(ctx);
        }
    }
}
