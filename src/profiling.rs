use std::collections::HashMap;
use std::sync::LazyLock;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
struct FunctionTiming {
    total_duration: Duration,
    call_count: u64,
}

pub struct Profiler {
    timings: Arc<Mutex<HashMap<String, FunctionTiming>>>,
}

pub static GLOBAL_PROFILER: LazyLock<Profiler> = LazyLock::new(Profiler::new);

impl Profiler {
    fn new() -> Self {
        let timings = Arc::new(Mutex::new(HashMap::<String, FunctionTiming>::new()));
        let timings_clone = Arc::clone(&timings);
        thread::spawn(move || {
            let mut last_report_time = Instant::now();
            loop {
                thread::sleep(Duration::from_secs(5));

                let interval_duration;
                let report_data: Vec<(String, FunctionTiming)>;

                // Try to hold the lock for as short as possible
                {
                    let mut timings_guard = timings_clone.lock().unwrap();
                    let now = Instant::now();

                    interval_duration = now.duration_since(last_report_time);

                    report_data = timings_guard
                        .iter()
                        .map(|(name, timing)| (name.clone(), timing.clone()))
                        .collect();

                    // Reset timings for the next interval
                    for (_, timing) in timings_guard.iter_mut() {
                        timing.total_duration = Duration::ZERO;
                        timing.call_count = 0;
                    }
                    last_report_time = now;
                }

                // Nothing was timed in this interval, skip the report
                if report_data.iter().all(|(_, timing)| timing.call_count == 0) {
                    continue;
                }

                println!(
                    "[PROFILE] Report for the last {:.2}s:",
                    interval_duration.as_secs_f32()
                );

                let mut sorted_timings = report_data;
                sorted_timings.sort_by(|(name_a, timing_a), (name_b, timing_b)| {
                    timing_b
                        .total_duration
                        .cmp(&timing_a.total_duration)
                        .then_with(|| name_a.cmp(name_b))
                });

                for (name, timing) in sorted_timings {
                    let avg_duration_ms = if timing.call_count > 0 {
                        (timing.total_duration.as_secs_f64() * 1000.0) / timing.call_count as f64
                    } else {
                        0.0
                    };
                    println!(
                        "[PROFILE]  - {}: {:.3}ms total ({} calls, avg {:.3}ms/call)",
                        name,
                        timing.total_duration.as_secs_f64() * 1000.0,
                        timing.call_count,
                        avg_duration_ms
                    );
                }

                println!("[PROFILE] --- End of Report ---");
            }
        });

        Self { timings }
    }

    pub fn start_timing(&self, fn_name: &'static str) -> TimingGuard {
        TimingGuard {
            fn_name,
            started: Instant::now(),
            timings_map: Arc::clone(&self.timings),
        }
    }
}

pub struct TimingGuard {
    fn_name: &'static str,
    started: Instant,
    timings_map: Arc<Mutex<HashMap<String, FunctionTiming>>>,
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let duration = self.started.elapsed();
        let mut timings = self.timings_map.lock().unwrap();
        let entry = timings.entry(self.fn_name.to_string()).or_default();
        entry.total_duration += duration;
        entry.call_count += 1;
    }
}
