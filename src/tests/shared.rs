use crate::{Deque, Queue, Stack};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

const THREADS: i32 = 4;
const PER_THREAD: i32 = 1000;

fn expected() -> Vec<i32> {
    (0..THREADS * PER_THREAD).collect()
}

#[test]
fn deque_concurrent_push_back() {
    let deque = Arc::new(Deque::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let deque = Arc::clone(&deque);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    deque.push_back(t * PER_THREAD + i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // No value lost, none duplicated; order across threads is unspecified.
    assert_eq!(deque.len(), (THREADS * PER_THREAD) as usize);
    let mut values = Vec::new();
    while let Some(value) = deque.pop_front() {
        values.push(value);
    }
    values.sort_unstable();
    assert_eq!(values, expected());
}

#[test]
fn stack_concurrent_push() {
    let stack = Arc::new(Stack::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let stack = Arc::clone(&stack);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    stack.push(t * PER_THREAD + i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(stack.len(), (THREADS * PER_THREAD) as usize);
    let mut values = Vec::new();
    while let Some(value) = stack.pop() {
        values.push(value);
    }
    values.sort_unstable();
    assert_eq!(values, expected());
}

#[test]
fn deque_transfer_conserves_values() {
    let deque = Arc::new(Deque::new());
    let done = Arc::new(AtomicBool::new(false));

    let producers: Vec<_> = (0..2)
        .map(|t| {
            let deque = Arc::clone(&deque);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    deque.push_back(t * PER_THREAD + i);
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..2)
        .map(|_| {
            let deque = Arc::clone(&deque);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut taken = Vec::new();
                loop {
                    match deque.pop_front() {
                        Some(value) => taken.push(value),
                        None => {
                            if done.load(Ordering::Acquire) && deque.is_empty() {
                                break taken;
                            }
                            thread::yield_now();
                        }
                    }
                }
            })
        })
        .collect();

    for handle in producers {
        handle.join().unwrap();
    }
    done.store(true, Ordering::Release);

    let mut values = Vec::new();
    for handle in consumers {
        values.extend(handle.join().unwrap());
    }
    values.sort_unstable();
    assert_eq!(values, (0..2 * PER_THREAD).collect::<Vec<_>>());
    assert!(deque.is_empty());
}

#[test]
fn deque_both_end_pops_conserve_values() {
    let deque = Arc::new(Deque::new());
    for value in 0..2 * PER_THREAD {
        deque.push_back(value);
    }

    let poppers: Vec<_> = (0..2)
        .map(|from_back| {
            let deque = Arc::clone(&deque);
            thread::spawn(move || {
                let mut taken = Vec::new();
                loop {
                    let value = if from_back == 1 {
                        deque.pop_back()
                    } else {
                        deque.pop_front()
                    };
                    match value {
                        Some(value) => taken.push(value),
                        None => break taken,
                    }
                }
            })
        })
        .collect();

    let mut values = Vec::new();
    for handle in poppers {
        values.extend(handle.join().unwrap());
    }
    values.sort_unstable();
    assert_eq!(values, (0..2 * PER_THREAD).collect::<Vec<_>>());
}

#[test]
fn stack_transfer_conserves_values() {
    let stack = Arc::new(Stack::new());
    let done = Arc::new(AtomicBool::new(false));

    let producer = thread::spawn({
        let stack = Arc::clone(&stack);
        move || {
            for i in 0..PER_THREAD {
                stack.push(i);
            }
        }
    });

    let consumer = thread::spawn({
        let stack = Arc::clone(&stack);
        let done = Arc::clone(&done);
        move || {
            let mut taken = Vec::new();
            loop {
                match stack.pop() {
                    Some(value) => taken.push(value),
                    None => {
                        if done.load(Ordering::Acquire) && stack.is_empty() {
                            break taken;
                        }
                        thread::yield_now();
                    }
                }
            }
        }
    });

    producer.join().unwrap();
    done.store(true, Ordering::Release);

    let mut values = consumer.join().unwrap();
    values.sort_unstable();
    assert_eq!(values, (0..PER_THREAD).collect::<Vec<_>>());
}

#[test]
fn queue_concurrent_producers_single_consumer() {
    let queue = Arc::new(Queue::new());
    let done = Arc::new(AtomicBool::new(false));

    let producers: Vec<_> = (0..THREADS)
        .map(|t| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    queue.push(t * PER_THREAD + i);
                }
            })
        })
        .collect();

    let consumer = thread::spawn({
        let queue = Arc::clone(&queue);
        let done = Arc::clone(&done);
        move || {
            let mut taken = Vec::new();
            loop {
                match queue.pop() {
                    Some(value) => taken.push(value),
                    None => {
                        if done.load(Ordering::Acquire) && queue.is_empty() {
                            break taken;
                        }
                        thread::yield_now();
                    }
                }
            }
        }
    });

    for handle in producers {
        handle.join().unwrap();
    }
    done.store(true, Ordering::Release);

    let mut values = consumer.join().unwrap();
    // A single consumer sees each producer's values in its push order.
    for t in 0..THREADS {
        let of_thread: Vec<_> = values
            .iter()
            .copied()
            .filter(|v| v / PER_THREAD == t)
            .collect();
        assert_eq!(
            of_thread,
            (t * PER_THREAD..(t + 1) * PER_THREAD).collect::<Vec<_>>()
        );
    }
    values.sort_unstable();
    assert_eq!(values, expected());
}
