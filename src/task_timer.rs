pub struct TaskTimer {
    started: std::time::Instant,
    task_name: String,
}

impl TaskTimer {
    pub fn new(task_name: impl AsRef<str>) -> Self {
        let started = std::time::Instant::now();
        println!("Task: {} started", task_name.as_ref());
        Self {
            started,
            task_name: task_name.as_ref().to_string(),
        }
    }

    pub fn stop(&self) {
        println!(
            "Task: {} finished in {:.1}ms",
            self.task_name,
            self.started.elapsed().as_secs_f64() * 1000.0
        );
    }

    /// Like `stop`, but also reports how many spans the task went through.
    pub fn stop_with_count(&self, spans: usize) {
        println!(
            "Task: {} finished in {:.1}ms ({} spans)",
            self.task_name,
            self.started.elapsed().as_secs_f64() * 1000.0,
            spans
        );
    }
}
