/// Snapshot of the controls held during one tick.
///
/// The host refreshes this from key-down/key-up state; the simulation reads
/// it once per tick and never sees individual key events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub drift: bool,
    pub boost: bool,
}
