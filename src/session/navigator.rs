/// Position tracker over an exam's ordered question list.
#[derive(Debug, Clone)]
pub struct QuestionNavigator {
    current: usize,
    count: usize,
}

impl QuestionNavigator {
    pub fn new(question_count: usize) -> Self {
        Self {
            current: 0,
            count: question_count,
        }
    }

    /// 0-based index of the current question.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn question_count(&self) -> usize {
        self.count
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.count == 0 || self.current == self.count - 1
    }

    /// No-op at the last question.
    pub fn next(&mut self) {
        if !self.is_last() {
            self.current += 1;
        }
    }

    /// No-op at the first question.
    pub fn previous(&mut self) {
        if !self.is_first() {
            self.current -= 1;
        }
    }

    /// Jumps to `index`. Out-of-range indices are silently ignored.
    pub fn go_to(&mut self, index: usize) {
        if index < self.count {
            self.current = index;
        }
    }
}
