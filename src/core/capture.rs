//! Call-stack capture for events

use super::call_frame::{CallFrame, CallType};

/// Capture the current call stack as a list of frames, innermost first.
///
/// Frames belonging to the unwinder itself are dropped, then empty frames are
/// discarded, and finally the first `skip` remaining frames are skipped. The
/// count applies to the filtered list, so `skip = 1` removes this function's
/// own frame. Returns an empty list when symbols cannot be resolved.
#[inline(never)]
pub fn capture_backtrace(skip: usize) -> Vec<CallFrame> {
    let mut raw = Vec::new();
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            raw.push(frame_from_symbol(
                symbol.name().map(|name| format!("{:#}", name)),
                symbol.filename().map(|path| path.display().to_string()),
                symbol.lineno(),
            ));
        });
        true
    });

    // Everything inside the unwinder sits before this function's own frame.
    let own = raw.iter().rposition(|frame| {
        frame
            .function
            .as_deref()
            .is_some_and(|function| function.ends_with("capture_backtrace"))
    });
    if let Some(own) = own {
        raw.drain(..own);
    }

    collect_frames(raw, skip)
}

/// Drop empty frames, then skip the first `skip` of what is left
pub fn collect_frames<I>(frames: I, skip: usize) -> Vec<CallFrame>
where
    I: IntoIterator<Item = CallFrame>,
{
    frames
        .into_iter()
        .filter(|frame| !frame.is_empty())
        .skip(skip)
        .collect()
}

/// Build a frame from a demangled symbol path such as
/// `app::server::Server::accept::{{closure}}`.
pub fn frame_from_symbol(
    name: Option<String>,
    file: Option<String>,
    line: Option<u32>,
) -> CallFrame {
    let mut frame = CallFrame {
        file,
        line,
        ..CallFrame::default()
    };

    let Some(mut path) = name.filter(|name| !name.is_empty()) else {
        return frame;
    };

    let mut closure = false;
    while let Some(stripped) = path.strip_suffix("::{{closure}}") {
        closure = true;
        path = stripped.to_string();
    }

    match split_last_segment(&path) {
        Some((owner, function)) if looks_like_type(owner) => {
            frame.class = Some(owner.to_string());
            frame.function = Some(function.to_string());
            frame.call_type = Some(CallType::Static);
        }
        _ => {
            frame.function = Some(path.clone());
            frame.call_type = Some(CallType::Function);
        }
    }

    if closure {
        frame.call_type = Some(CallType::Closure);
    }
    frame
}

/// Split at the last `::` that is not nested inside `<...>`
fn split_last_segment(path: &str) -> Option<(&str, &str)> {
    let bytes = path.as_bytes();
    let mut depth = 0i32;
    let mut split = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth -= 1,
            b':' if depth == 0 && i + 1 < bytes.len() && bytes[i + 1] == b':' => {
                split = Some(i);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    split.map(|idx| (&path[..idx], &path[idx + 2..]))
}

fn looks_like_type(owner: &str) -> bool {
    if owner.starts_with('<') {
        return true;
    }
    let last = split_last_segment(owner).map_or(owner, |(_, last)| last);
    last.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> CallFrame {
        CallFrame::new().with_function(name)
    }

    #[test]
    fn test_skip_applies_after_filtering() {
        let raw = vec![
            named("internal_a"),
            CallFrame::new(),
            named("internal_b"),
            CallFrame::new(),
            named("internal_c"),
            named("caller"),
            named("main"),
        ];

        let frames = collect_frames(raw, 3);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].function.as_deref(), Some("caller"));
    }

    #[test]
    fn test_skip_past_end_is_empty() {
        let frames = collect_frames(vec![named("only")], 5);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_frame_from_method_symbol() {
        let frame = frame_from_symbol(
            Some("app::server::Server::accept".to_string()),
            Some("src/server.rs".to_string()),
            Some(42),
        );
        assert_eq!(frame.class.as_deref(), Some("app::server::Server"));
        assert_eq!(frame.function.as_deref(), Some("accept"));
        assert_eq!(frame.call_type, Some(CallType::Static));
        assert_eq!(frame.line, Some(42));
    }

    #[test]
    fn test_frame_from_free_function() {
        let frame = frame_from_symbol(Some("app::run".to_string()), None, None);
        assert_eq!(frame.class, None);
        assert_eq!(frame.function.as_deref(), Some("app::run"));
        assert_eq!(frame.call_type, Some(CallType::Function));
    }

    #[test]
    fn test_frame_from_closure_and_trait_impl() {
        let frame = frame_from_symbol(
            Some("app::Worker::spawn::{{closure}}".to_string()),
            None,
            None,
        );
        assert_eq!(frame.class.as_deref(), Some("app::Worker"));
        assert_eq!(frame.function.as_deref(), Some("spawn"));
        assert_eq!(frame.call_type, Some(CallType::Closure));

        let frame = frame_from_symbol(
            Some("<app::Job as core::ops::Drop>::drop".to_string()),
            None,
            None,
        );
        assert_eq!(frame.class.as_deref(), Some("<app::Job as core::ops::Drop>"));
        assert_eq!(frame.function.as_deref(), Some("drop"));
    }

    #[test]
    fn test_unresolved_symbol_is_empty() {
        assert!(frame_from_symbol(None, None, None).is_empty());
    }

    #[test]
    fn test_capture_starts_with_own_frame() {
        // Symbol names are not guaranteed in every build; only assert when present.
        let frames = capture_backtrace(0);
        let resolved = frames.iter().any(|frame| {
            frame
                .function
                .as_deref()
                .is_some_and(|function| function.ends_with("capture_backtrace"))
        });
        if resolved {
            let first = frames[0].function.as_deref().unwrap_or_default();
            assert!(first.ends_with("capture_backtrace"), "got {}", first);
        }
    }
}
