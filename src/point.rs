// Copyright 2023 John Nunley
//
// This file is part of trapmap.
//
// trapmap is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// trapmap is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License
// for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with trapmap. If not, see <https://www.gnu.org/licenses/>.

use crate::ApproxEq;

use core::fmt;
use core::ops;

use num_traits::real::Real;
use num_traits::{One, Zero};

macro_rules! two_dimensional {
    (
        $(#[$outer:meta])*
        $name:ident $diff:ident
    ) => {
        $(#[$outer])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
        pub struct $name<T: Copy> {
            x: T,
            y: T,
        }

        impl<T: Copy + fmt::Debug> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.debug_tuple(stringify!($name))
                    .field(&self.x())
                    .field(&self.y())
                    .finish()
            }
        }

        impl<T: Copy> $name<T> {
            /// Constructor of two elements.
            #[inline]
            pub fn new(x: T, y: T) -> Self {
                $name { x, y }
            }

            /// Get the X coordinate.
            #[inline]
            pub fn x(self) -> T {
                self.x
            }

            /// Get the Y coordinate.
            #[inline]
            pub fn y(self) -> T {
                self.y
            }
        }

        impl<T: Copy + Zero> $name<T> {
            /// Constructor with zero coordinates.
            #[inline]
            pub fn zero() -> Self {
                $name::new(T::zero(), T::zero())
            }
        }

        impl<T: Copy + ops::Add<Output = T>> ops::Add<$diff<T>> for $name<T> {
            type Output = Self;

            #[inline]
            fn add(self, other: $diff<T>) -> Self {
                $name::new(self.x + other.x(), self.y + other.y())
            }
        }

        impl<T: Copy + ops::Sub<Output = T>> ops::Sub<$diff<T>> for $name<T> {
            type Output = Self;

            #[inline]
            fn sub(self, other: $diff<T>) -> Self {
                $name::new(self.x - other.x(), self.y - other.y())
            }
        }

        impl<T: Copy + ops::Neg<Output = T>> ops::Neg for $name<T> {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                $name::new(-self.x, -self.y)
            }
        }

        impl<T: Copy + ApproxEq> $name<T> {
            /// Check if all coordinates are approximately equal to another's.
            #[inline]
            pub fn approx_eq(&self, other: &Self) -> bool {
                self.x().approx_eq(&other.x()) &&
                self.y().approx_eq(&other.y())
            }
        }
    }
}

two_dimensional! {
    /// A two-dimensional point in space.
    Point Vector
}

two_dimensional! {
    /// A two-dimensional vector describing the distance between two points.
    Vector Vector
}

impl<T: Copy + ops::Sub<Output = T>> ops::Sub<Point<T>> for Point<T> {
    type Output = Vector<T>;

    #[inline]
    fn sub(self, other: Point<T>) -> Vector<T> {
        Vector::new(self.x() - other.x(), self.y() - other.y())
    }
}

impl<T: Copy> Point<T> {
    /// Convert this point to a vector.
    pub fn into_vector(self) -> Vector<T> {
        Vector::new(self.x(), self.y())
    }

    /// Get the midpoint between this point and another point.
    #[inline]
    pub fn midpoint(self, other: Self) -> Self
    where
        T: ops::Add<Output = T> + ops::Div<Output = T> + One,
    {
        let two = T::one() + T::one();
        Point::new((self.x() + other.x()) / two, (self.y() + other.y()) / two)
    }
}

impl<T: Copy> Vector<T> {
    /// Get the dot product of two vectors.
    #[inline]
    pub fn dot(self, other: Self) -> T
    where
        T: ops::Add<Output = T> + ops::Mul<Output = T>,
    {
        self.x() * other.x() + self.y() * other.y()
    }

    /// Get the cross product of two vectors.
    #[inline]
    pub fn cross(self, other: Self) -> T
    where
        T: ops::Sub<Output = T> + ops::Mul<Output = T>,
    {
        self.x() * other.y() - self.y() * other.x()
    }

    /// Get the square length of this vector.
    #[inline]
    pub fn length_squared(self) -> T
    where
        T: ops::Add<Output = T> + ops::Mul<Output = T>,
    {
        self.dot(self)
    }

    /// Get the length of the vector.
    #[inline]
    pub fn length(self) -> T
    where
        T: Real,
    {
        self.length_squared().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Vector};

    #[test]
    fn test_point() {
        let point = Point::new(1.0, 2.0);
        assert_eq!(point.x(), 1.0);
        assert_eq!(point.y(), 2.0);
    }

    #[test]
    fn test_add() {
        let point = Point::new(1.0, 2.0);
        let vector = Vector::new(3.0, 4.0);
        let result = point + vector;
        assert_eq!(result.x(), 4.0);
        assert_eq!(result.y(), 6.0);
    }

    #[test]
    fn test_sub_points() {
        let point1 = Point::new(1.0, 2.0);
        let point2 = Point::new(3.0, 5.0);
        let result = point2 - point1;
        assert_eq!(result.x(), 2.0);
        assert_eq!(result.y(), 3.0);
    }

    #[test]
    fn test_dot() {
        let vector1 = Vector::new(1.0, 2.0);
        let vector2 = Vector::new(3.0, 4.0);
        let result = vector1.dot(vector2);
        assert_eq!(result, 11.0);
    }

    #[test]
    fn test_cross() {
        let vector1 = Vector::new(1.0, 2.0);
        let vector2 = Vector::new(3.0, 4.0);
        let result = vector1.cross(vector2);
        assert_eq!(result, -2.0);
    }

    #[test]
    fn test_length_squared() {
        let vector = Vector::new(3.0, 4.0);
        assert_eq!(vector.length_squared(), 25.0);
    }

    #[test]
    fn test_midpoint() {
        let point1 = Point::new(1.0, 2.0);
        let point2 = Point::new(1.0, 4.0);
        let result = point1.midpoint(point2);
        assert_eq!(result.x(), 1.0);
        assert_eq!(result.y(), 3.0);
    }
}
