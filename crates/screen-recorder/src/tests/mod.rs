mod executable_installer;
mod process_engine;
