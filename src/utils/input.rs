use std::io;
use std::io::Write;

use rpassword::read_password;

pub fn input(prompt: &str) -> io::Result<String> {
    print!("{} ", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Reads a password without echoing it.
pub fn input_password(prompt: &str) -> io::Result<String> {
    print!("{} ", prompt);
    io::stdout().flush()?;
    Ok(read_password()?.trim().to_string())
}
