use crate::reporter::types::Expectation;

/// 断言错误信息所在行的标记
const ERROR_MARKER: &str = "Error:";

/// 在堆栈中寻找最可能指向用户代码的一行
///
/// 候选行既不包含 `Error:`，也不包含任何依赖目录标记。
/// 有多个候选行时取**最后一个**，而不是第一个。
pub fn find_suspect_line<'a, S: AsRef<str>>(stack: &'a str, markers: &[S]) -> Option<&'a str> {
    stack.split('\n').rfind(|line| is_candidate(line, markers))
}

fn is_candidate<S: AsRef<str>>(line: &str, markers: &[S]) -> bool {
    !line.contains(ERROR_MARKER) && !markers.iter().any(|m| line.contains(m.as_ref()))
}

/// 为失败断言填充 `hasSuspectLine` / `suspectLine`
pub fn mark_suspect_line<S: AsRef<str>>(failure: &mut Expectation, markers: &[S]) {
    let suspect = failure
        .stack
        .as_deref()
        .and_then(|stack| find_suspect_line(stack, markers))
        .map(str::to_string);

    failure.has_suspect_line = Some(suspect.is_some());
    failure.suspect_line = suspect;
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKERS: &[&str] = &["node_modules"];

    #[test]
    fn test_single_candidate() {
        let stack = "Error: Expected 1 to be 2.\n    at Object.<anonymous> (/app/spec/math.spec.js:4:15)\n    at /app/node_modules/jasmine-core/lib/jasmine.js:100:12";
        assert_eq!(
            find_suspect_line(stack, MARKERS),
            Some("    at Object.<anonymous> (/app/spec/math.spec.js:4:15)")
        );
    }

    #[test]
    fn test_last_candidate_wins() {
        let stack = "Error: boom\n    at first (/app/src/a.js:1:1)\n    at second (/app/src/b.js:2:2)\n    at /app/node_modules/x.js:3:3";
        assert_eq!(
            find_suspect_line(stack, MARKERS),
            Some("    at second (/app/src/b.js:2:2)")
        );
    }

    #[test]
    fn test_no_candidate() {
        let stack = "Error: boom\n    at /app/node_modules/x.js:3:3";
        assert_eq!(find_suspect_line(stack, MARKERS), None);
    }

    #[test]
    fn test_custom_markers() {
        let stack = "thread 'main' panicked\n   at src/lib.rs:10:5\n   at /home/u/.cargo/registry/src/x.rs:1:1";
        let markers = vec!["/.cargo/registry".to_string()];
        assert_eq!(
            find_suspect_line(stack, markers.as_slice()),
            Some("   at src/lib.rs:10:5")
        );
    }

    #[test]
    fn test_mark_expectation() {
        let mut failure = Expectation::new(
            "Expected true to be false.",
            "Error: Expected true to be false.\n    at UserContext.<anonymous> (spec/a.spec.js:9:20)",
        );
        mark_suspect_line(&mut failure, MARKERS);
        assert_eq!(failure.has_suspect_line, Some(true));
        assert_eq!(
            failure.suspect_line.as_deref(),
            Some("    at UserContext.<anonymous> (spec/a.spec.js:9:20)")
        );
    }

    #[test]
    fn test_mark_expectation_without_stack() {
        let mut failure = Expectation {
            message: Some("Failed".to_string()),
            ..Expectation::default()
        };
        mark_suspect_line(&mut failure, MARKERS);
        assert_eq!(failure.has_suspect_line, Some(false));
        assert_eq!(failure.suspect_line, None);
    }
}
