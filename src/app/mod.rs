// Application layer: interactive front end over the registration service.

pub mod shell;

pub use shell::Shell;
