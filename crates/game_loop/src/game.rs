//! Host callbacks

use crate::BoxError;

/// The simulation the loop drives
///
/// `update` advances the simulation by exactly one fixed tick; `render` draws
/// the latest state. Any error is fatal to the loop and is returned from
/// [`FixedTimestepLoop::run`](crate::FixedTimestepLoop::run). Retrying belongs
/// in the implementation, not the loop.
pub trait Game {
    /// Advance the simulation by one tick
    fn update(&mut self) -> Result<(), BoxError>;

    /// Draw the current state
    fn render(&mut self) -> Result<(), BoxError>;
}

impl<G: Game + ?Sized> Game for &mut G {
    fn update(&mut self) -> Result<(), BoxError> {
        (**self).update()
    }

    fn render(&mut self) -> Result<(), BoxError> {
        (**self).render()
    }
}

impl<G: Game + ?Sized> Game for Box<G> {
    fn update(&mut self) -> Result<(), BoxError> {
        (**self).update()
    }

    fn render(&mut self) -> Result<(), BoxError> {
        (**self).render()
    }
}

/// [`Game`] built from a pair of closures, see [`callbacks`]
pub struct Callbacks<U, R> {
    update: U,
    render: R,
}

impl<U, R> Game for Callbacks<U, R>
where
    U: FnMut() -> Result<(), BoxError>,
    R: FnMut() -> Result<(), BoxError>,
{
    fn update(&mut self) -> Result<(), BoxError> {
        (self.update)()
    }

    fn render(&mut self) -> Result<(), BoxError> {
        (self.render)()
    }
}

/// Adapt an `update` and a `render` closure into a [`Game`]
///
/// ```
/// use game_loop::{callbacks, Game};
///
/// let mut ticks = 0;
/// let mut game = callbacks(|| { ticks += 1; Ok(()) }, || Ok(()));
/// game.update().unwrap();
/// drop(game);
/// assert_eq!(ticks, 1);
/// ```
pub fn callbacks<U, R>(update: U, render: R) -> Callbacks<U, R>
where
    U: FnMut() -> Result<(), BoxError>,
    R: FnMut() -> Result<(), BoxError>,
{
    Callbacks { update, render }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callbacks_forward() {
        let mut updates = 0;
        let mut renders = 0;
        {
            let mut game = callbacks(
                || {
                    updates += 1;
                    Ok(())
                },
                || {
                    renders += 1;
                    Ok(())
                },
            );
            game.update().unwrap();
            game.update().unwrap();
            game.render().unwrap();
        }
        assert_eq!(updates, 2);
        assert_eq!(renders, 1);
    }

    #[test]
    fn test_callbacks_propagate_errors() {
        let mut game = callbacks(|| Err("tick failed".into()), || Ok(()));
        let err = game.update().unwrap_err();
        assert_eq!(err.to_string(), "tick failed");
    }

    #[test]
    fn test_boxed_dyn_game() {
        let mut game: Box<dyn Game> = Box::new(callbacks(|| Ok(()), || Err("no".into())));
        assert!(game.update().is_ok());
        assert!(game.render().is_err());
    }
}
