use crate::{Deque, Queue, Stack};

fn deque_of(values: &[i32]) -> Deque<i32> {
    let deque = Deque::new();
    for &value in values {
        deque.push_back(value);
    }
    deque
}

#[test]
fn empty_renders_brackets() {
    assert_eq!(format!("{}", Deque::<i32>::new()), "[]");
    assert_eq!(format!("{}", Stack::<i32>::new()), "[]");
    assert_eq!(format!("{}", Queue::<i32>::new()), "[]");
}

#[test]
fn deque_renders_front_to_back() {
    let deque = deque_of(&[1, 2, 3]);
    assert_eq!(format!("{}", deque), "[1 2 3]");
}

#[test]
fn precision_limits_element_count() {
    let deque = deque_of(&[1, 2, 3, 4, 5]);
    assert_eq!(format!("{:.3}", deque), "[1 2 3 ...+2]");
    assert_eq!(format!("{:.9}", deque), "[1 2 3 4 5]");
    // Zero precision is raised to showing a single element.
    assert_eq!(format!("{:.0}", deque), "[1 ...+4]");
}

#[test]
fn width_shows_half_with_a_floor_of_three() {
    let deque = deque_of(&[1, 2, 3, 4, 5]);
    assert_eq!(format!("{:10}", deque), "[1 2 3 4 5]");
    assert_eq!(format!("{:4}", deque), "[1 2 3 ...+2]");
}

#[test]
fn precision_wins_over_width() {
    let deque = deque_of(&[1, 2, 3, 4, 5]);
    assert_eq!(format!("{:10.2}", deque), "[1 2 ...+3]");
}

#[test]
fn stack_renders_top_first() {
    let stack = Stack::new();
    for value in [1, 2, 3, 4, 5] {
        stack.push(value);
    }
    assert_eq!(format!("{}", stack), "[5 4 3 2 1]");
    assert_eq!(format!("{:4}", stack), "[5 4 3 ...+2]");
    assert_eq!(format!("{:.2}", stack), "[5 4 ...+3]");
}

#[test]
fn queue_renders_like_its_deque() {
    let queue = Queue::new();
    for value in [1, 2, 3, 4, 5] {
        queue.push(value);
    }
    assert_eq!(format!("{}", queue), "[1 2 3 4 5]");
    assert_eq!(format!("{:.3}", queue), "[1 2 3 ...+2]");
}
