//! Thread CPU-time clock, gated per platform. None of this touches the JVM so
//! it is unit-testable without one.

use std::io::Write;

/// Exact bytes the diagnostic print emits. No trailing newline.
pub const DIAGNOSTIC_MESSAGE: &str = " C says hello - printing";

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    #[error("No thread CPU-time clock source is available on this platform.")]
    UnsupportedClockSource,
}

/// Returns the CPU time consumed by the calling thread, in nanoseconds.
///
/// The reference point is unspecified: values are monotonically non-decreasing
/// within a thread but are not comparable across threads and are not
/// wall-clock time.
#[cfg(unix)]
pub fn thread_cpu_time() -> Result<i64, ClockError> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    let ret = unsafe { libc::clock_gettime(libc::CLOCK_THREAD_CPUTIME_ID, &mut ts) };
    if ret != 0 {
        return Err(ClockError::UnsupportedClockSource);
    }
    Ok(ts.tv_sec as i64 * 1_000_000_000 + ts.tv_nsec as i64)
}

/// Returns the CPU time consumed by the calling thread, in nanoseconds.
///
/// Windows has no `CLOCK_THREAD_CPUTIME_ID` equivalent; `GetThreadTimes`
/// reports kernel and user time in 100-ns `FILETIME` ticks so the sum of the
/// two is the thread's consumed CPU time.
#[cfg(windows)]
pub fn thread_cpu_time() -> Result<i64, ClockError> {
    use windows::Win32::Foundation::FILETIME;
    use windows::Win32::System::Threading::{GetCurrentThread, GetThreadTimes};

    fn ticks(ft: &FILETIME) -> u64 {
        (ft.dwHighDateTime as u64) << 32 | ft.dwLowDateTime as u64
    }

    let mut creation = FILETIME::default();
    let mut exit = FILETIME::default();
    let mut kernel = FILETIME::default();
    let mut user = FILETIME::default();
    let ok = unsafe {
        GetThreadTimes(
            GetCurrentThread(),
            &mut creation,
            &mut exit,
            &mut kernel,
            &mut user,
        )
    };
    if !ok.as_bool() {
        return Err(ClockError::UnsupportedClockSource);
    }
    Ok(((ticks(&kernel) + ticks(&user)) * 100) as i64)
}

#[cfg(not(any(unix, windows)))]
pub fn thread_cpu_time() -> Result<i64, ClockError> {
    Err(ClockError::UnsupportedClockSource)
}

/// Writes [`DIAGNOSTIC_MESSAGE`] to stdout. Fire-and-forget: a failed write is
/// not observable to the caller.
pub fn diagnostic_print() {
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(DIAGNOSTIC_MESSAGE.as_bytes());
    // There is no newline to trigger a line-buffered flush
    let _ = stdout.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spin(iters: u64) -> u64 {
        let mut acc = 0u64;
        for i in 0..iters {
            acc = acc.wrapping_add(i).rotate_left(7);
        }
        std::hint::black_box(acc)
    }

    #[test]
    fn reads_are_non_negative() {
        assert!(thread_cpu_time().unwrap() >= 0);
    }

    #[test]
    fn same_thread_reads_are_monotonic() {
        let t1 = thread_cpu_time().unwrap();
        spin(100_000);
        let t2 = thread_cpu_time().unwrap();
        assert!(t2 >= t1);
    }

    #[test]
    fn idle_reads_are_close_together() {
        let t1 = thread_cpu_time().unwrap();
        let t2 = thread_cpu_time().unwrap();
        assert!(t2 >= t1);
        // Adjacent reads on an idle thread stay well under 100 ms apart
        assert!(t2 - t1 < 100_000_000);
    }

    #[test]
    fn busy_loop_advances_the_clock() {
        let t1 = thread_cpu_time().unwrap();
        spin(50_000_000);
        let t2 = thread_cpu_time().unwrap();
        // Tens of millions of iterations burn CPU time past any plausible
        // clock resolution
        assert!(t2 > t1);
    }

    #[test]
    fn each_thread_observes_its_own_monotonic_sequence() {
        const NUM_THREADS: usize = 4;
        const READS: usize = 1000;

        let handles: Vec<_> = (0..NUM_THREADS)
            .map(|_| {
                std::thread::spawn(|| {
                    let mut prev = thread_cpu_time().unwrap();
                    for _ in 0..READS {
                        spin(100);
                        let now = thread_cpu_time().unwrap();
                        assert!(now >= prev);
                        prev = now;
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn diagnostic_message_is_the_expected_bytes() {
        assert_eq!(DIAGNOSTIC_MESSAGE.as_bytes(), b" C says hello - printing");
    }
}
