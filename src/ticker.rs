use std::{
    ops::ControlFlow,
    sync::mpsc::{self, RecvTimeoutError},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

/// a periodic task running on its own thread
///
/// ticks are scheduled at a fixed rate (`delay`, `delay + period`, `delay + 2 * period`, ...)
/// so a slow tick doesn't push every later one back.
/// the task ends when the tick returns [`ControlFlow::Break`] or when the handle is cancelled/dropped.
#[derive(Debug)]
pub struct Ticker {
    name: &'static str,
    // dropping the sender wakes the thread up with `Disconnected`
    cancel: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn<F>(name: &'static str, delay: Duration, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let (cancel, cancelled) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            let mut next = Instant::now() + delay;
            loop {
                let wait = next.saturating_duration_since(Instant::now());
                match cancelled.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                if tick().is_break() {
                    log::debug!("{name} ticker finished");
                    break;
                }
                next += period;
            }
        });
        log::debug!("{name} ticker started");
        Self {
            name,
            cancel,
            handle,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// stops the task, the returned handle can be joined to wait for the thread to exit
    pub fn cancel(self) -> JoinHandle<()> {
        log::debug!("{} ticker cancelled", self.name);
        let _ = self.cancel.send(());
        self.handle
    }
}

/// the "at most one task of a kind" slot every driver keeps
#[derive(Debug, Default)]
pub struct TaskSlot {
    task: Option<Ticker>,
    generation: u64,
}

impl TaskSlot {
    /// cancels whatever is running and returns the generation for the next task
    pub fn next_generation(&mut self) -> u64 {
        self.cancel();
        self.generation += 1;
        self.generation
    }

    pub fn install(&mut self, ticker: Ticker) {
        // next_generation already cancelled the old one, this only catches misuse
        if let Some(old) = self.task.replace(ticker) {
            old.cancel();
        }
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
    }

    /// invalidates updates still in flight without starting anything new
    pub fn retire(&mut self) {
        self.cancel();
        self.generation += 1;
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(Ticker::is_running)
    }
}
