//! legacy exit status codes for system programs.
//! reference: [SYSEXITS](https://man.freebsd.org/cgi/man.cgi?query=sysexits&apropos=0&sektion=0&manpath=FreeBSD+11.2-stable&arch=default&format=html)

/// value: 2 <br>
/// Misuse of shell builtins (according to Bash documentation)
pub const EX_KEYWORD: i32 = 2;

/// value: 64 <br>
/// The command was used incorrectly, e.g. an unknown project name.
pub const EX_USAGE: i32 = 64;

/// value: 66 <br>
/// An input file or directory did not exist or was not readable.
/// Used when a project's local path is missing or is not a directory.
pub const EX_NOINPUT: i32 = 66;

/// value: 70 <br>
/// A hook or the config sync command exited with a non-zero status.
pub const EX_SOFTWARE: i32 = 70;

/// value: 71 <br>
/// An operating system error has been detected, e.g. a child process could not be spawned.
pub const EX_OSERR: i32 = 71;

/// value: 74 <br>
/// An error occurred while doing I/O, including a failed transfer.
pub const EX_IOERR: i32 = 74;

/// value: 78 <br>
/// Something was found in an unconfigured or misconfigured state.
pub const EX_CONFIG: i32 = 78;
