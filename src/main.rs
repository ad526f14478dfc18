use hrtimer::{diagnostic_print, thread_cpu_time};

// Smoke check for the exported operations without going through a JVM:
// a burst of prints, a run of clock reads, another burst of prints.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    for _ in 0..5 {
        diagnostic_print();
    }
    for _ in 0..6 {
        println!("{}", thread_cpu_time()?);
    }
    for _ in 0..5 {
        diagnostic_print();
    }
    Ok(())
}
