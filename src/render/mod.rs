mod terminal;

pub use terminal::TerminalRenderer;
