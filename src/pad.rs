//! Joypad functions and structures.

use crate::warnln;

/// Host-side snapshot of the eight Game Boy keys, pressed
/// keys are set to true.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct JoypadState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub start: bool,
    pub select: bool,
    pub a: bool,
    pub b: bool,
}

#[derive(Clone, Copy, PartialEq)]
pub enum PadSelection {
    Action,
    Direction,
    None,
}

pub struct Pad {
    state: JoypadState,
    selection: PadSelection,
    int_pad: bool,
}

impl Pad {
    pub fn new() -> Self {
        Self {
            state: JoypadState::default(),
            selection: PadSelection::None,
            int_pad: false,
        }
    }

    pub fn reset(&mut self) {
        self.state = JoypadState::default();
        self.selection = PadSelection::None;
        self.int_pad = false;
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            // 0xFF00 — P1/JOYP: the selected key row, active low
            0xff00 => {
                let value = match self.selection {
                    PadSelection::Action => {
                        (if self.state.a { 0x00 } else { 0x01 })
                            | (if self.state.b { 0x00 } else { 0x02 })
                            | (if self.state.select { 0x00 } else { 0x04 })
                            | (if self.state.start { 0x00 } else { 0x08 })
                    }
                    PadSelection::Direction => {
                        (if self.state.right { 0x00 } else { 0x01 })
                            | (if self.state.left { 0x00 } else { 0x02 })
                            | (if self.state.up { 0x00 } else { 0x04 })
                            | (if self.state.down { 0x00 } else { 0x08 })
                    }
                    PadSelection::None => 0x0f,
                };
                let selection = match self.selection {
                    PadSelection::Action => 0x10,
                    PadSelection::Direction => 0x20,
                    PadSelection::None => 0x30,
                };
                value | selection | 0xc0
            }
            _ => {
                warnln!("Reading from unknown Pad location 0x{:04x}", addr);
                0xff
            }
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // 0xFF00 — P1/JOYP: row selection through bits 4/5
            0xff00 => {
                self.selection = if value & 0x10 == 0x00 {
                    PadSelection::Direction
                } else if value & 0x20 == 0x00 {
                    PadSelection::Action
                } else {
                    PadSelection::None
                }
            }
            _ => warnln!("Writing to unknown Pad location 0x{:04x}", addr),
        }
    }

    /// Replaces the key state with the one provided by the host,
    /// requesting the joypad interrupt when any key transitions
    /// into the pressed state.
    pub fn set_state(&mut self, state: JoypadState) {
        let pressed = (!self.state.up && state.up)
            || (!self.state.down && state.down)
            || (!self.state.left && state.left)
            || (!self.state.right && state.right)
            || (!self.state.start && state.start)
            || (!self.state.select && state.select)
            || (!self.state.a && state.a)
            || (!self.state.b && state.b);
        if pressed {
            self.int_pad = true;
        }
        self.state = state;
    }

    pub fn state(&self) -> JoypadState {
        self.state
    }

    #[inline(always)]
    pub fn int_pad(&self) -> bool {
        self.int_pad
    }

    #[inline(always)]
    pub fn set_int_pad(&mut self, value: bool) {
        self.int_pad = value;
    }

    #[inline(always)]
    pub fn ack_pad(&mut self) {
        self.set_int_pad(false);
    }
}

impl Default for Pad {
    fn default() -> Self {
        Self::new()
    }
}
