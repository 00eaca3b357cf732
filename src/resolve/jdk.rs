// src/resolve/jdk.rs
//! Built-in catalogue of commonly used JDK types.
//!
//! Stands in for a real platform class path so that everyday references
//! (`String`, `List`, `IOException`) classify as external instead of unresolved.

pub const LIBRARY_NAME: &str = "<jdk>";

/// Package name and the whitespace-separated simple names catalogued under it.
const PACKAGES: &[(&str, &str)] = &[
    (
        "java.lang",
        "
        Appendable ArithmeticException ArrayIndexOutOfBoundsException AssertionError
        AutoCloseable Boolean Byte CharSequence Character Class ClassCastException
        ClassLoader ClassNotFoundException CloneNotSupportedException Cloneable Comparable
        Deprecated Double Enum Error Exception Float FunctionalInterface
        IllegalArgumentException IllegalStateException IndexOutOfBoundsException Integer
        InterruptedException Iterable Long Math NullPointerException Number
        NumberFormatException Object OutOfMemoryError Override Process ProcessBuilder
        Readable Record Runnable Runtime RuntimeException SafeVarargs SecurityException
        Short StackOverflowError StrictMath String StringBuffer StringBuilder
        SuppressWarnings System Thread ThreadLocal Throwable UnsupportedOperationException
        Void
        ",
    ),
    (
        "java.util",
        "
        AbstractList AbstractMap ArrayDeque ArrayList Arrays BitSet Calendar Collection
        Collections Comparator Date Deque EnumMap EnumSet HashMap HashSet Iterator
        LinkedHashMap LinkedHashSet LinkedList List ListIterator Locale Map Map.Entry
        NavigableMap NavigableSet NoSuchElementException Objects Optional OptionalInt
        OptionalLong OptionalDouble PriorityQueue Properties Queue Random Scanner Set
        SortedMap SortedSet Stack StringJoiner TreeMap TreeSet UUID Vector
        ",
    ),
    (
        "java.util.concurrent",
        "
        Callable CompletableFuture ConcurrentHashMap ConcurrentMap CountDownLatch
        ExecutionException Executor ExecutorService Executors Future TimeUnit
        TimeoutException
        ",
    ),
    (
        "java.util.function",
        "
        BiConsumer BiFunction BiPredicate BinaryOperator Consumer Function IntFunction
        Predicate Supplier ToIntFunction UnaryOperator
        ",
    ),
    (
        "java.util.stream",
        "
        Collectors IntStream LongStream Stream StreamSupport
        ",
    ),
    (
        "java.io",
        "
        BufferedReader BufferedWriter Closeable File FileInputStream FileNotFoundException
        FileOutputStream FileReader FileWriter IOException InputStream InputStreamReader
        OutputStream PrintStream PrintWriter Reader Serializable StringReader StringWriter
        UncheckedIOException Writer
        ",
    ),
    (
        "java.nio.file",
        "
        Files Path Paths StandardOpenOption
        ",
    ),
];

/// Fully qualified names of every catalogued type.
#[must_use]
pub fn catalogue() -> Vec<String> {
    PACKAGES
        .iter()
        .flat_map(|(pkg, names)| names.split_whitespace().map(move |n| format!("{pkg}.{n}")))
        .collect()
}
