/// The four face buttons of the display HAT, in board order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Buttons {
    A,
    B,
    X,
    Y,
}

impl Buttons {
    pub const ALL: [Buttons; 4] = [Buttons::A, Buttons::B, Buttons::X, Buttons::Y];

    /// BCM pin the button is wired to.
    pub const fn pin(self) -> u8 {
        match self {
            Buttons::A => 5,
            Buttons::B => 6,
            Buttons::X => 16,
            Buttons::Y => 24,
        }
    }

    pub const fn from_pin(pin: u8) -> Option<Buttons> {
        match pin {
            5 => Some(Buttons::A),
            6 => Some(Buttons::B),
            16 => Some(Buttons::X),
            24 => Some(Buttons::Y),
            _ => None,
        }
    }
}

/// Two-frame button sampler. Frontends feed the raw level of every button
/// once per frame; edges come from the current/previous pair, so a press
/// held across frames fires `is_pressed` exactly once.
#[derive(Clone, Copy, Default)]
pub struct ButtonState {
    current: u8,
    previous: u8,
}

impl ButtonState {
    pub fn update(&mut self, current: u8) {
        self.previous = self.current;
        self.current = current;
    }

    fn held(&self) -> u8 {
        self.current & self.previous
    }

    fn pressed(&self) -> u8 {
        self.current & !self.previous
    }

    fn released(&self) -> u8 {
        !self.current & self.previous
    }

    pub fn is_held(&self, button: Buttons) -> bool {
        let mask = 1 << (button as u8);
        (self.held() & mask) != 0
    }

    pub fn is_pressed(&self, button: Buttons) -> bool {
        let mask = 1 << (button as u8);
        (self.pressed() & mask) != 0
    }

    pub fn is_released(&self, button: Buttons) -> bool {
        let mask = 1 << (button as u8);
        (self.released() & mask) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_fires_on_rising_edge_only() {
        let mut state = ButtonState::default();
        state.update(1 << (Buttons::A as u8));
        assert!(state.is_pressed(Buttons::A));
        assert!(!state.is_held(Buttons::A));

        state.update(1 << (Buttons::A as u8));
        assert!(!state.is_pressed(Buttons::A));
        assert!(state.is_held(Buttons::A));

        state.update(0);
        assert!(state.is_released(Buttons::A));
        assert!(!state.is_pressed(Buttons::A));
    }

    #[test]
    fn buttons_are_independent() {
        let mut state = ButtonState::default();
        state.update(1 << (Buttons::X as u8) | 1 << (Buttons::Y as u8));
        assert!(state.is_pressed(Buttons::X));
        assert!(state.is_pressed(Buttons::Y));
        assert!(!state.is_pressed(Buttons::A));
        assert!(!state.is_pressed(Buttons::B));
    }

    #[test]
    fn pin_mapping_round_trips() {
        for button in Buttons::ALL {
            assert_eq!(Buttons::from_pin(button.pin()), Some(button));
        }
        assert_eq!(Buttons::from_pin(17), None);
    }
}
