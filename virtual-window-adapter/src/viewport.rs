/// The scrollable viewport, as seen by programmatic scrolling.
///
/// Implementations forward the positions to the real scroll container. The viewport reports the
/// resulting visible rect back through [`crate::Controller::on_visible_rect_change`].
pub trait ScrollViewport {
    fn set_scroll_left(&mut self, x: f64);
    fn set_scroll_top(&mut self, y: f64);
}
