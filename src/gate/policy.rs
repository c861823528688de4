//! Static command policy.
//!
//! [`classify`] runs a raw command string through an ordered rule table and
//! returns the first verdict that matches. Every reason is a static string
//! so the full set of outcomes can be enumerated and tested.

use tracing::debug;

/// Outcome of classifying one command.
///
/// A command can pass the static check and still require confirmation:
/// dangerous patterns and denylisted base commands are soft blocks where the
/// confirmation challenge is the real gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub passes_static_check: bool,
    pub reason: &'static str,
    pub requires_confirmation: bool,
}

impl Verdict {
    /// Denied outright; no confirmation can unlock it.
    pub fn is_terminal_deny(&self) -> bool {
        !self.passes_static_check && !self.requires_confirmation
    }

    /// Needs a matching challenge before it may run.
    pub fn needs_confirmation(&self) -> bool {
        self.requires_confirmation || !self.passes_static_check
    }
}

pub const REASON_EMPTY: &str = "empty command";
pub const REASON_DIRECT_PATH: &str = "direct path execution not allowed";
pub const REASON_SAFE: &str = "command is safe";

/// Substrings scanned for in the raw command, in priority order.
///
/// `> /dev` can never win over `> /`; it stays in the table so the list
/// reads the same as the policy it encodes.
pub const DANGEROUS_PATTERNS: &[(&str, &str)] = &[
    ("$(", "Command substitution is not allowed"),
    ("`", "Backtick command substitution is not allowed"),
    ("&&", "Command chaining is not allowed"),
    ("||", "Command chaining is not allowed"),
    (";", "Command chaining is not allowed"),
    ("| ", "Piping is not allowed"),
    ("> /", "Writing to root directory is not allowed"),
    ("> /dev", "Writing to devices is not allowed"),
];

/// Base commands that need confirmation, keyed by lower-cased first token.
pub const DENYLIST: &[(&str, &str)] = &[
    // File operations
    ("rm", "File deletion command is not allowed"),
    ("mv", "Moving files is not allowed"),
    ("cp", "Copying files is not allowed"),
    ("shred", "File shredding is not allowed"),
    ("srm", "Secure file deletion is not allowed"),
    ("unlink", "File unlinking is not allowed"),
    ("rename", "File renaming is not allowed"),
    // System administration
    ("sudo", "Elevated privileges are not allowed"),
    ("su", "Switching users is not allowed"),
    ("chroot", "Changing root is not allowed"),
    ("passwd", "Password changes are not allowed"),
    ("mkfs", "Filesystem formatting is not allowed"),
    ("fdisk", "Disk partitioning is not allowed"),
    ("parted", "Disk partitioning is not allowed"),
    ("mount", "Mounting filesystems is not allowed"),
    ("umount", "Unmounting filesystems is not allowed"),
    ("systemctl", "System control is not allowed"),
    ("service", "Service management is not allowed"),
    ("init", "Init commands are not allowed"),
    ("systemd", "Systemd commands are not allowed"),
    // Process management
    ("kill", "Process termination is not allowed"),
    ("pkill", "Process killing is not allowed"),
    ("killall", "Process killing is not allowed"),
    ("renice", "Process priority modification is not allowed"),
    ("nice", "Process priority modification is not allowed"),
    // System control
    ("shutdown", "System shutdown is not allowed"),
    ("reboot", "System reboot is not allowed"),
    ("poweroff", "System power off is not allowed"),
    ("halt", "System halt is not allowed"),
    // Networking
    ("wget", "Downloading files is not allowed"),
    ("curl", "Downloading files is not allowed"),
    ("nc", "Netcat operations are not allowed"),
    ("netcat", "Netcat operations are not allowed"),
    ("ssh", "SSH operations are not allowed"),
    ("ftp", "FTP operations are not allowed"),
    ("sftp", "SFTP operations are not allowed"),
    ("iptables", "Firewall modifications are not allowed"),
    ("ufw", "Firewall modifications are not allowed"),
    ("tcpdump", "Network packet capture is not allowed"),
    // Permissions and ownership
    ("chmod", "Changing file permissions is not allowed"),
    ("chown", "Changing file ownership is not allowed"),
    ("chgrp", "Changing group ownership is not allowed"),
    ("umask", "Changing file creation mask is not allowed"),
    // Package managers
    ("apt", "Package management is not allowed"),
    ("apt-get", "Package management is not allowed"),
    ("dpkg", "Package management is not allowed"),
    ("yum", "Package management is not allowed"),
    ("dnf", "Package management is not allowed"),
    ("pacman", "Package management is not allowed"),
    ("pip", "Python package management is not allowed"),
    ("npm", "Node.js package management is not allowed"),
    // Raw disk and swap
    ("dd", "Direct disk operations are not allowed"),
    ("mkswap", "Swap creation is not allowed"),
    ("swapoff", "Swap manipulation is not allowed"),
    ("swapon", "Swap manipulation is not allowed"),
    ("losetup", "Loop device setup is not allowed"),
    ("blockdev", "Block device operations are not allowed"),
    // Shell builtins
    ("eval", "Eval commands are not allowed"),
    ("exec", "Exec commands are not allowed"),
    ("source", "Sourcing files is not allowed"),
    (".", "Sourcing files is not allowed"),
    ("alias", "Creating aliases is not allowed"),
    // Users and groups
    ("useradd", "User creation is not allowed"),
    ("userdel", "User deletion is not allowed"),
    ("usermod", "User modification is not allowed"),
    ("groupadd", "Group creation is not allowed"),
    ("groupdel", "Group deletion is not allowed"),
    ("groupmod", "Group modification is not allowed"),
    // Information disclosure
    ("uname", "System information disclosure is not allowed"),
    ("hostname", "System information disclosure is not allowed"),
    ("id", "User information disclosure is not allowed"),
    ("who", "User information disclosure is not allowed"),
    ("w", "User information disclosure is not allowed"),
    ("last", "Login information disclosure is not allowed"),
    // File creation and modification
    ("touch", "File creation is not allowed"),
    ("truncate", "File truncation is not allowed"),
    ("mknod", "Device file creation is not allowed"),
    ("mkfifo", "FIFO creation is not allowed"),
    // Archives
    ("tar", "Archive operations are not allowed"),
    ("gzip", "Compression operations are not allowed"),
    ("gunzip", "Decompression operations are not allowed"),
    ("zip", "Compression operations are not allowed"),
    ("unzip", "Decompression operations are not allowed"),
    // Editors
    ("vi", "Text editor access is not allowed"),
    ("vim", "Text editor access is not allowed"),
    ("nano", "Text editor access is not allowed"),
    ("emacs", "Text editor access is not allowed"),
    ("ed", "Text editor access is not allowed"),
    ("git", "Git Access is not allowed."),
];

/// The command as each rule sees it.
struct Subject<'a> {
    raw: &'a str,
    tokens: Vec<String>,
}

impl Subject<'_> {
    fn base(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }
}

/// One row of the policy table. `check` returns the reason on a match.
struct Rule {
    check: fn(&Subject) -> Option<&'static str>,
    passes_static_check: bool,
    requires_confirmation: bool,
}

const RULES: &[Rule] = &[
    Rule {
        check: empty_command,
        passes_static_check: false,
        requires_confirmation: false,
    },
    Rule {
        check: dangerous_pattern,
        passes_static_check: true,
        requires_confirmation: true,
    },
    Rule {
        check: denylisted_base,
        passes_static_check: true,
        requires_confirmation: true,
    },
    Rule {
        check: direct_path,
        passes_static_check: false,
        requires_confirmation: false,
    },
];

fn empty_command(subject: &Subject) -> Option<&'static str> {
    subject.tokens.is_empty().then_some(REASON_EMPTY)
}

fn dangerous_pattern(subject: &Subject) -> Option<&'static str> {
    DANGEROUS_PATTERNS
        .iter()
        .find(|(pattern, _)| subject.raw.contains(pattern))
        .map(|(_, reason)| *reason)
}

fn denylisted_base(subject: &Subject) -> Option<&'static str> {
    let base = subject.base()?;
    DENYLIST
        .iter()
        .find(|(name, _)| *name == base)
        .map(|(_, reason)| *reason)
}

fn direct_path(subject: &Subject) -> Option<&'static str> {
    subject
        .base()
        .filter(|base| base.contains('/'))
        .map(|_| REASON_DIRECT_PATH)
}

/// Split the lower-cased command into shell words.
///
/// Unbalanced quoting falls back to plain whitespace splitting; the pattern
/// rule works on the raw string either way.
fn tokenize(command: &str) -> Vec<String> {
    let lowered = command.to_lowercase();
    match shell_words::split(&lowered) {
        Ok(tokens) => tokens,
        Err(err) => {
            debug!(%err, "shell tokenization failed, splitting on whitespace");
            lowered.split_whitespace().map(String::from).collect()
        }
    }
}

/// Classify a raw command string. First matching rule wins.
pub fn classify(command: &str) -> Verdict {
    let subject = Subject {
        raw: command,
        tokens: tokenize(command),
    };

    RULES
        .iter()
        .find_map(|rule| {
            (rule.check)(&subject).map(|reason| Verdict {
                passes_static_check: rule.passes_static_check,
                reason,
                requires_confirmation: rule.requires_confirmation,
            })
        })
        .unwrap_or(Verdict {
            passes_static_check: true,
            reason: REASON_SAFE,
            requires_confirmation: false,
        })
}
