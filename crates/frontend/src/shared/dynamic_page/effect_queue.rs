use std::collections::BTreeMap;

/// Номер эффекта в порядке запуска
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Очередь асинхронных эффектов (импорт файлов).
///
/// Результаты могут завершаться в любом порядке, но применяются строго
/// в порядке выдачи билетов: готовый результат ждёт все более ранние.
#[derive(Debug)]
pub struct EffectQueue<T> {
    next_ticket: u64,
    next_to_apply: u64,
    finished: BTreeMap<u64, Option<T>>,
}

impl<T> Default for EffectQueue<T> {
    fn default() -> Self {
        Self {
            next_ticket: 0,
            next_to_apply: 0,
            finished: BTreeMap::new(),
        }
    }
}

impl<T> EffectQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    /// Сохраняет результат и возвращает всё, что теперь можно применить по порядку
    pub fn complete(&mut self, ticket: Ticket, value: T) -> Vec<T> {
        self.finish(ticket, Some(value))
    }

    /// Эффект завершился без результата (ошибка разбора); очередь не блокируется
    pub fn skip(&mut self, ticket: Ticket) -> Vec<T> {
        self.finish(ticket, None)
    }

    fn finish(&mut self, ticket: Ticket, value: Option<T>) -> Vec<T> {
        if ticket.0 < self.next_to_apply {
            return Vec::new();
        }
        self.finished.insert(ticket.0, value);

        let mut ready = Vec::new();
        while let Some(value) = self.finished.remove(&self.next_to_apply) {
            self.next_to_apply += 1;
            if let Some(value) = value {
                ready.push(value);
            }
        }
        ready
    }

    pub fn pending(&self) -> usize {
        (self.next_ticket - self.next_to_apply) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_order_completions_apply_in_issuance_order() {
        let mut queue = EffectQueue::new();
        let first = queue.issue();
        let second = queue.issue();
        let third = queue.issue();

        assert!(queue.complete(third, "c").is_empty());
        assert!(queue.complete(second, "b").is_empty());
        assert_eq!(queue.complete(first, "a"), vec!["a", "b", "c"]);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn skipped_ticket_does_not_block_later_ones() {
        let mut queue = EffectQueue::new();
        let first = queue.issue();
        let second = queue.issue();
        assert!(queue.complete(second, 2).is_empty());
        assert_eq!(queue.skip(first), vec![2]);
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut queue = EffectQueue::new();
        let first = queue.issue();
        assert_eq!(queue.complete(first, 1), vec![1]);
        assert!(queue.complete(first, 1).is_empty());
    }
}
