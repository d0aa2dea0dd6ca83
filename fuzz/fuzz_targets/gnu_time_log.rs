#![no_main]

use case_gnu_time::gnu_time::TimeLog;
use case_gnu_time::timestamp::Timestamp;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Neither the log parser nor the duration/timestamp arithmetic may panic
        let log = TimeLog::parse(input);
        let _ = log.exit_status();
        if let Ok(elapsed) = log.elapsed() {
            if let (Ok(exit), Ok(delta)) = (
                Timestamp::parse("2024-01-01T00:10:00+00:00"),
                elapsed.to_duration(),
            ) {
                let _ = exit.checked_sub(delta);
            }
        }
        let _ = Timestamp::parse(input);
    }
});
