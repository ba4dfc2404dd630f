use crate::{DataProvider, Grid, RenderHost};

/// Identifies a registered plugin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PluginId(pub(crate) u64);

/// An extension attached to one grid.
///
/// `init` runs on registration and typically subscribes to `grid.events`; `destroy` runs when
/// the plugin is unregistered or the grid is destroyed.
pub trait Plugin<D: DataProvider, H: RenderHost> {
    fn init(&mut self, grid: &mut Grid<D, H>);

    fn destroy(&mut self, _grid: &mut Grid<D, H>) {}
}
