use std::sync::{Arc, Mutex};

use quickcheck::quickcheck;
use rand::seq::SliceRandom;
use rand::thread_rng;
use xstream::stream_configuration::MAX_CAPACITY;
use xstream::{of, Options, StreamError};

#[tokio::test]
async fn test_sort() {
    let ints = vec![4, 2, 1, 441, 23, 14, 1, 23];
    let mut expected = ints.clone();
    expected.sort();
    let items = of(ints).sort(|a, b| a < b).to_vec().await;
    assert_eq!(items, expected);
}

#[tokio::test]
async fn test_sort_shuffled_input() {
    let mut ints: Vec<u32> = (0..500).collect();
    ints.shuffle(&mut thread_rng());
    let items = of(ints).sort(|a, b| a > b).to_vec().await;
    assert_eq!(items, (0..500).rev().collect::<Vec<_>>());
}

#[tokio::test]
async fn test_sort_is_stable() {
    let items = of(vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')])
        .sort(|a, b| a.0 < b.0)
        .to_vec()
        .await;
    assert_eq!(items, vec![(0, 'b'), (0, 'd'), (1, 'a'), (1, 'c')]);
}

#[tokio::test]
async fn test_group_by() {
    let mut groups = of(vec![1, 2, 3, 4, 5])
        .group_by(|x| x % 2)
        .to_vec()
        .await;
    groups.sort();
    assert_eq!(groups, vec![vec![1, 3, 5], vec![2, 4]]);
}

#[tokio::test]
async fn test_reverse() {
    let items = of(vec![1, 2, 3, 4, 1]).reverse().to_vec().await;
    assert_eq!(items, vec![1, 4, 3, 2, 1]);
}

#[tokio::test]
async fn test_merge() {
    let items = of(vec![1, 2, 3, 4]).merge().to_vec().await;
    assert_eq!(items, vec![vec![1, 2, 3, 4]]);
}

#[tokio::test]
async fn test_merge_of_empty_emits_one_empty_vec() {
    let items = of(Vec::<i32>::new()).merge().to_vec().await;
    assert_eq!(items, vec![Vec::<i32>::new()]);
}

#[tokio::test]
async fn test_tail() {
    assert_eq!(of(vec![1, 232, 3, 2, 3]).tail(1).to_vec().await, vec![3]);
    assert_eq!(of(vec![1, 232, 3, 2, 3]).tail(2).to_vec().await, vec![2, 3]);
}

#[tokio::test]
async fn test_tail_longer_than_stream() {
    assert_eq!(of(vec![1, 2, 3]).tail(10).to_vec().await, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_tail_with_huge_size_keeps_everything() {
    assert_eq!(of(vec![1, 2, 3]).tail(usize::MAX).to_vec().await, vec![1, 2, 3]);
    assert_eq!(of(vec![1u8, 2, 3]).tail(1 << 40).to_vec().await, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_tail_zero() {
    assert!(of(vec![1, 2, 3, 4]).tail(0).to_vec().await.is_empty());
}

#[tokio::test]
async fn test_skip() {
    assert_eq!(of(vec![1, 2, 3, 4]).skip(1).count().await, 3);
    assert_eq!(of(vec![1, 2, 3, 4]).skip(3).to_vec().await, vec![4]);
    assert_eq!(of(vec![1, 2, 3]).skip(0).to_vec().await, vec![1, 2, 3]);
    assert!(of(vec![1, 2, 3]).skip(5).to_vec().await.is_empty());
}

#[tokio::test]
async fn test_limit() {
    assert_eq!(of(vec![1, 2, 3, 4]).limit(3).to_vec().await, vec![1, 2, 3]);
    assert_eq!(of(vec![1, 2, 3, 4]).limit(4).to_vec().await, vec![1, 2, 3, 4]);
    assert_eq!(of(vec![1, 2, 3, 4]).limit(5).to_vec().await, vec![1, 2, 3, 4]);
    assert!(of(vec![1, 2, 3, 4]).limit(0).to_vec().await.is_empty());
}

#[tokio::test]
async fn test_distinct() {
    let items = of(vec![1, 2, 3, 4, 4, 22, 2, 1, 4])
        .distinct(|x| *x)
        .to_vec()
        .await;
    assert_eq!(items, vec![1, 2, 3, 4, 22]);
}

#[tokio::test]
async fn test_distinct_by_derived_key() {
    let items = of(vec!["apple", "avocado", "banana", "blueberry", "cherry"])
        .distinct(|s| s.chars().next())
        .to_vec()
        .await;
    assert_eq!(items, vec!["apple", "banana", "cherry"]);
}

#[tokio::test]
async fn test_buffer() {
    let stream = of(vec![1, 2, 4]).buffer(10);
    assert_eq!(stream.capacity(), 10);
    let stream = stream.buffer(0);
    assert_eq!(stream.capacity(), 1);
    assert_eq!(stream.to_vec().await, vec![1, 2, 4]);
}

#[tokio::test]
async fn test_buffer_with_huge_size_is_clamped() {
    let stream = of(vec![1, 2, 4]).buffer(usize::MAX);
    assert_eq!(stream.capacity(), MAX_CAPACITY);
    assert_eq!(stream.to_vec().await, vec![1, 2, 4]);
}

#[tokio::test]
async fn test_peek() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&seen);
    let items = of(vec![1, 2, 3, 4])
        .peek(move |x| record.lock().unwrap().push(*x))
        .to_vec()
        .await;
    assert_eq!(items, vec![1, 2, 3, 4]);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_split() {
    let mut chunks = of(vec![1, 2, 444, 441, 1]).split(3).unwrap();
    assert_eq!(chunks.recv().await, Some(vec![1, 2, 444]));
    assert_eq!(chunks.recv().await, Some(vec![441, 1]));
    assert_eq!(chunks.recv().await, None);
}

#[tokio::test]
async fn test_split_exact_multiple() {
    let chunks = of(vec![1, 2, 3, 4]).split(2).unwrap().to_vec().await;
    assert_eq!(chunks, vec![vec![1, 2], vec![3, 4]]);
}

#[tokio::test]
async fn test_split_zero_is_rejected() {
    let err = of(vec![1, 2, 444, 441, 1]).split(0).unwrap_err();
    assert!(matches!(err, StreamError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_split_stream() {
    let mut streams = of(vec![1, 2, 444, 441, 1]).split_stream(3).unwrap();
    let first = streams.recv().await.unwrap();
    assert_eq!(first.to_vec().await, vec![1, 2, 444]);
    let second = streams.recv().await.unwrap();
    assert_eq!(second.to_vec().await, vec![441, 1]);
    assert!(streams.recv().await.is_none());

    assert!(of(vec![1]).split_stream(0).is_err());
}

#[tokio::test]
async fn test_copy_delivers_everything_to_every_output() {
    let mut copies = of(vec![1, 2, 3]).copy(vec![("small", 1), ("large", 8)]);
    let small = copies.remove("small").unwrap();
    let large = copies.remove("large").unwrap();
    assert_eq!(large.capacity(), 8);

    let (a, b) = tokio::join!(small.to_vec(), large.to_vec());
    assert_eq!(a, vec![1, 2, 3]);
    assert_eq!(b, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_copy_survives_a_dropped_output() {
    let mut copies = of((0..20).collect::<Vec<_>>()).copy(vec![(1, 2), (2, 2)]);
    drop(copies.remove(&2));
    let kept = copies.remove(&1).unwrap();
    assert_eq!(kept.to_vec().await, (0..20).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_copy_with_huge_capacity_is_clamped() {
    let mut copies = of(vec![1, 2, 3]).copy(vec![("wide", usize::MAX)]);
    let wide = copies.remove("wide").unwrap();
    assert_eq!(wide.capacity(), MAX_CAPACITY);
    assert_eq!(wide.to_vec().await, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_copy_with_no_outputs() {
    let copies = of(vec![1, 2]).copy(Vec::<(&str, usize)>::new());
    assert!(copies.is_empty());
}

#[tokio::test]
async fn test_chained_operators() {
    let items = of((1..=20).collect::<Vec<_>>())
        .filter(|x| x % 3 == 0, Options::default())
        .map(|x| x * 2, Options::default())
        .skip(1)
        .limit(3)
        .reverse()
        .to_vec()
        .await;
    assert_eq!(items, vec![24, 18, 12]);
}

quickcheck! {
    fn prop_sort_is_idempotent(xs: Vec<i32>) -> bool {
        tokio_test::block_on(async move {
            let once = of(xs.clone()).sort(|a, b| a < b).to_vec().await;
            let twice = of(xs).sort(|a, b| a < b).sort(|a, b| a < b).to_vec().await;
            once == twice
        })
    }

    fn prop_reverse_twice_is_identity(xs: Vec<i32>) -> bool {
        tokio_test::block_on(async move {
            of(xs.clone()).reverse().reverse().to_vec().await == xs
        })
    }

    fn prop_tail_keeps_last_elements(xs: Vec<i32>, n: u8) -> bool {
        let n = n as usize;
        let expected = xs[xs.len().saturating_sub(n)..].to_vec();
        tokio_test::block_on(async move { of(xs).tail(n).to_vec().await == expected })
    }

    fn prop_skip_then_limit(xs: Vec<i32>, skip: u8, limit: u8) -> bool {
        let (skip, limit) = (skip as usize, limit as usize);
        let expected: Vec<i32> = xs.iter().copied().skip(skip).take(limit).collect();
        tokio_test::block_on(async move {
            of(xs).skip(skip).limit(limit).to_vec().await == expected
        })
    }
}
