//! Virtual path building. The working path always begins with `/`, the
//! root is `/`, and no path ever ends in `/` except the root itself
//! (arguments with a trailing slash keep it so callers can reject
//! directory targets).

/// Extracts one parameter from `input`, advancing the cursor. CR/LF are
/// skipped (or stop the scan when `stop_on_newline` is set), repeated
/// `/` collapse into one, and a space ends the parameter only when
/// `stop_on_space` is set — credentials never contain spaces, path
/// arguments may.
pub fn pop_param(input: &mut &str, stop_on_space: bool, stop_on_newline: bool) -> String {
    let cursor = *input;
    let mut out = String::new();
    let mut consumed = 0;
    let mut last = '\0';
    for ch in cursor.chars() {
        if stop_on_space && ch == ' ' {
            break;
        }
        if ch == '\r' || ch == '\n' {
            if stop_on_newline {
                break;
            }
            consumed += ch.len_utf8();
            continue;
        }
        if ch == '/' && last == '/' {
            consumed += ch.len_utf8();
            continue;
        }
        last = ch;
        out.push(ch);
        consumed += ch.len_utf8();
    }
    *input = &cursor[consumed..];
    out
}

/// Appends `child` to `pwd`: an absolute child replaces the path, a
/// relative one is joined with a `/` separator.
pub fn open_child(pwd: &mut String, child: &str) {
    if child.is_empty() {
        return;
    }
    if child.starts_with('/') {
        *pwd = child.to_string();
    } else {
        if pwd.len() > 1 && !pwd.ends_with('/') {
            pwd.push('/');
        }
        pwd.push_str(child);
    }
}

/// Pops one path segment, clamped at the root. A bare trailing slash is
/// stripped without removing a segment.
pub fn close_child(pwd: &mut String) {
    if pwd.ends_with('/') && pwd.len() > 1 {
        pwd.pop();
        if pwd.is_empty() {
            pwd.push('/');
        }
        return;
    }
    match pwd.rfind('/') {
        Some(0) | None => *pwd = String::from("/"),
        Some(i) => pwd.truncate(i),
    }
}

/// Joins `pwd` and `arg` without mutating the working path.
pub fn join_child(pwd: &str, arg: &str) -> String {
    let mut path = pwd.to_string();
    open_child(&mut path, arg);
    path
}
